use crate::completion::Request;
use crate::config::Mapping;
use crate::fs::FileInfo;
use serde::Serialize;

/// Single-line range in UTF-16 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextRange {
    pub line: u32,
    pub start: u32,
    pub end: u32,
}

impl TextRange {
    pub fn new(line: u32, start: u32, end: u32) -> Self {
        Self { line, start, end }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub new_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionKind {
    File,
    Folder,
    Module,
}

/// Host-independent completion item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathCompletion {
    pub label: String,
    pub kind: CompletionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    pub text_edit: TextEdit,
    /// Ask the host to open the suggestion list again after inserting.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retrigger: bool,
}

/// The `..` entry that climbs one directory.
pub fn up_item(request: &Request) -> PathCompletion {
    let new_text = if request.config.auto_slash_after_directory {
        "../"
    } else {
        ".."
    };
    PathCompletion {
        label: "..".to_string(),
        kind: CompletionKind::Folder,
        sort_text: None,
        text_edit: TextEdit {
            range: request.import_range,
            new_text: new_text.to_string(),
        },
        retrigger: true,
    }
}

pub fn path_item(info: &FileInfo, request: &Request) -> PathCompletion {
    let kind = if info.is_npm_module() {
        CompletionKind::Module
    } else if info.is_file {
        CompletionKind::File
    } else {
        CompletionKind::Folder
    };
    decorate(info.file.clone(), info, kind, request)
}

/// Entry for a mapping target, offered when nothing is typed yet.
///
/// Label and inserted text are the mapping key rather than the base name of
/// the target directory: `@ -> src` inserts `@`, which later requests resolve
/// through the mapping, whereas `src` would not resolve from most files.
/// `info` still decides the kind and the directory slash rules.
pub fn mapping_item(mapping: &Mapping, info: &FileInfo, request: &Request) -> PathCompletion {
    let kind = if mapping.npm || info.is_npm_module() {
        CompletionKind::Module
    } else if info.is_file {
        CompletionKind::File
    } else {
        CompletionKind::Folder
    };
    let name = mapping.key.trim_end_matches('/').to_string();
    decorate(name, info, kind, request)
}

fn decorate(name: String, info: &FileInfo, kind: CompletionKind, request: &Request) -> PathCompletion {
    let group = match kind {
        CompletionKind::Module => 'c',
        CompletionKind::File => 'b',
        CompletionKind::Folder => 'a',
    };
    let sort_text = Some(format!("{}_{}", group, name));

    let (label, new_text) = if info.is_file {
        let new_text = strip_extension(&name, request).unwrap_or_else(|| name.clone());
        (name, new_text)
    } else {
        let new_text = if request.config.auto_slash_after_directory {
            format!("{}/", name)
        } else {
            name.clone()
        };
        (format!("{}/", name), new_text)
    };

    PathCompletion {
        label,
        kind,
        sort_text,
        text_edit: TextEdit {
            range: request.import_range,
            new_text,
        },
        retrigger: false,
    }
}

/// In import contexts a file sharing the document's extension is inserted
/// without it, unless extensions are configured to stay.
fn strip_extension(name: &str, request: &Request) -> Option<String> {
    if request.config.with_extension || !request.is_import {
        return None;
    }
    let (stem, extension) = name.rsplit_once('.')?;
    if stem.is_empty() || request.document_extension.as_deref() != Some(extension) {
        return None;
    }
    Some(stem.to_string())
}
