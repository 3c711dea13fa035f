use crate::LspServer;
use crate::util::{is_untitled, uri_to_path};
use pathsense_core::util::line_at;
use pathsense_core::{CompletionInput, CompletionKind, PathCompletion};
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;

const TRIGGER_SUGGEST: &str = "editor.action.triggerSuggest";

pub async fn completion(
    server: &LspServer,
    params: CompletionParams,
) -> Result<Option<CompletionResponse>> {
    let uri = params.text_document_position.text_document.uri;
    let position = params.text_document_position.position;

    let open = server.documents.get(&uri).map(|doc| doc.content.clone());
    let content = match open {
        Some(content) => content,
        None => match uri.to_file_path() {
            Ok(path) => tokio::fs::read_to_string(path).await.unwrap_or_default(),
            Err(_) => String::new(),
        },
    };

    let file_name = uri_to_path(&uri);
    let input = CompletionInput {
        file_name: &file_name,
        untitled: is_untitled(&uri),
        line_text: line_at(&content, position.line as usize),
        line: position.line,
        character: position.character,
    };

    let config = server.config().await;
    let items = pathsense_core::complete(&input, &config).await;

    if items.is_empty() {
        Ok(None)
    } else {
        Ok(Some(CompletionResponse::Array(
            items.into_iter().map(to_lsp_item).collect(),
        )))
    }
}

pub fn to_lsp_item(item: PathCompletion) -> CompletionItem {
    let edit = item.text_edit;
    let range = Range::new(
        Position::new(edit.range.line, edit.range.start),
        Position::new(edit.range.line, edit.range.end),
    );

    CompletionItem {
        label: item.label,
        kind: Some(match item.kind {
            CompletionKind::File => CompletionItemKind::FILE,
            CompletionKind::Folder => CompletionItemKind::FOLDER,
            CompletionKind::Module => CompletionItemKind::MODULE,
        }),
        sort_text: item.sort_text,
        text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(range, edit.new_text))),
        command: item.retrigger.then(|| Command {
            title: "Trigger Suggest".to_string(),
            command: TRIGGER_SUGGEST.to_string(),
            arguments: None,
        }),
        ..Default::default()
    }
}
