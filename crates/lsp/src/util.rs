use std::path::PathBuf;
use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

/// File names whose contents feed the configuration snapshot.
const PROJECT_CONFIG_FILES: [&str; 2] = ["tsconfig.json", "jsconfig.json"];

/// Open document text as last synchronised by the client.
pub struct Document {
    pub content: String,
    pub version: i32,
}

impl Document {
    pub fn new(content: String, version: i32) -> Self {
        Self { content, version }
    }

    /// The document after `changes`, or `None` when `version` is not newer
    /// than the one already held.
    pub fn changed(&self, version: i32, changes: &[TextDocumentContentChangeEvent]) -> Option<Self> {
        if version <= self.version {
            return None;
        }
        Some(Self::new(apply_changes(&self.content, changes), version))
    }
}

/// Applies `didChange` events in order. Ranged events splice by UTF-16
/// position; an event without a range replaces the whole text.
pub fn apply_changes(content: &str, changes: &[TextDocumentContentChangeEvent]) -> String {
    let mut content = content.to_string();
    for change in changes {
        match change.range {
            Some(range) => {
                let start = offset_at(&content, range.start);
                let end = offset_at(&content, range.end).max(start);
                content.replace_range(start..end, &change.text);
            }
            None => content = change.text.clone(),
        }
    }
    content
}

/// Whether saving `uri` should rebuild the configuration snapshot.
pub fn is_project_config(uri: &Url) -> bool {
    uri.to_file_path()
        .ok()
        .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .is_some_and(|name| PROJECT_CONFIG_FILES.contains(&name.as_str()))
}

/// Path used to resolve relative fragments. Documents without a file path
/// (e.g. `untitled:`) resolve against the URI path.
pub fn uri_to_path(uri: &Url) -> PathBuf {
    uri.to_file_path()
        .unwrap_or_else(|_| PathBuf::from(uri.path()))
}

pub fn is_untitled(uri: &Url) -> bool {
    uri.scheme() == "untitled"
}

/// Byte offset of an LSP position (UTF-16 columns) in `text`.
pub fn offset_at(text: &str, position: Position) -> usize {
    let mut line = 0;
    let mut offset = 0;
    let mut chars = text.chars().peekable();

    while line < position.line as usize {
        match chars.next() {
            Some(c) => {
                offset += c.len_utf8();
                if c == '\n' {
                    line += 1;
                } else if c == '\r' {
                    if let Some(lf) = chars.next_if_eq(&'\n') {
                        offset += lf.len_utf8();
                    }
                    line += 1;
                }
            }
            None => return offset,
        }
    }

    let mut utf16_count = 0;
    while utf16_count < position.character as usize {
        match chars.next() {
            Some(c) if c != '\n' && c != '\r' => {
                utf16_count += c.len_utf16();
                offset += c.len_utf8();
            }
            _ => break,
        }
    }
    offset
}
