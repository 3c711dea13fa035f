use crate::config::Config;
use crate::fs::{list_children, mapping_entries};
use crate::items::{PathCompletion, TextRange, mapping_item, path_item, up_item};
use crate::npm::npm_module_mappings;
use crate::resolve::get_path;
use crate::text;
use std::path::{Path, PathBuf};

/// Cursor context handed over by the host.
#[derive(Debug, Clone)]
pub struct CompletionInput<'a> {
    pub file_name: &'a Path,
    /// Documents that were never saved have no meaningful extension.
    pub untitled: bool,
    pub line_text: &'a str,
    pub line: u32,
    pub character: u32,
}

/// Everything derived from the cursor position for one completion request.
#[derive(Debug, Clone)]
pub struct Request {
    pub config: Config,
    pub file_name: PathBuf,
    pub text_current_line: String,
    pub line: u32,
    pub character: u32,
    pub text_within_string: String,
    pub quotation_position: Option<u32>,
    pub import_range: TextRange,
    pub is_import: bool,
    pub document_extension: Option<String>,
}

impl Request {
    pub fn new(input: &CompletionInput<'_>, config: Config) -> Self {
        let line_text = input.line_text;
        let col = input.character;
        Self {
            config,
            file_name: input.file_name.to_path_buf(),
            text_current_line: line_text.to_string(),
            line: input.line,
            character: col,
            text_within_string: text::text_within_string(line_text, col),
            quotation_position: text::quotation_position(line_text, col),
            import_range: text::import_range(input.line, line_text, col),
            is_import: text::is_import_export_or_require(line_text),
            document_extension: text::document_extension(input.file_name, input.untitled),
        }
    }
}

/// Whether the cursor context warrants suggestions at all.
pub fn should_provide(request: &Request) -> bool {
    let typed = request.text_within_string.as_str();
    let typed_anything = !typed.is_empty();

    if request.is_import {
        let starts_with_dot = typed.starts_with('.');
        let starts_with_mapping = typed_anything
            && request
                .config
                .mappings
                .iter()
                .any(|mapping| typed.starts_with(mapping.key.as_str()));
        return starts_with_dot || starts_with_mapping || !typed_anything;
    }

    typed_anything
}

pub async fn provide(mut request: Request) -> Vec<PathCompletion> {
    if request.text_within_string.is_empty() {
        request.import_range = text::string_start_range(
            request.line,
            &request.text_current_line,
            request.character,
        );
        let mut items = vec![up_item(&request)];
        for (mapping, info) in mapping_entries(&request.config.mappings).await {
            items.push(mapping_item(&mapping, &info, &request));
        }
        return items;
    }

    let dir = get_path(
        &request.file_name,
        &request.text_within_string,
        request.config.absolute_root(),
        &request.config.mappings,
    );
    tracing::debug!("Listing {} for '{}'", dir.display(), request.text_within_string);

    let children = list_children(&dir, &request.config).await;
    let mut items = Vec::with_capacity(children.len() + 1);
    items.push(up_item(&request));
    items.extend(children.iter().map(|info| path_item(info, &request)));
    items
}

/// Completion items for the cursor described by `input`. Package-manager
/// modules are re-read for every request and appended to the mappings.
pub async fn complete(input: &CompletionInput<'_>, config: &Config) -> Vec<PathCompletion> {
    let npm = match &config.workspace_root {
        Some(root) => npm_module_mappings(root).await,
        None => Vec::new(),
    };
    let request = Request::new(input, config.with_extra_mappings(npm));

    if !should_provide(&request) {
        tracing::trace!(
            "No path completion for '{}' (import: {})",
            request.text_within_string,
            request.is_import
        );
        return Vec::new();
    }

    provide(request).await
}
