//! Line-level heuristics deciding where the typed path starts and whether
//! the line is an import-like statement.
//!
//! Columns are UTF-16 code units, as reported by the editor.

use crate::items::TextRange;
use crate::util::{byte_col_to_utf16_col, utf16_col_to_byte_col};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static IMPORT_LIKE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:import|export)\b|\brequire\s*\(|\bimport\s*\(")
        .expect("import pattern is valid")
});

fn text_to_position(line: &str, col: u32) -> &str {
    &line[..utf16_col_to_byte_col(line, col as usize)]
}

/// Column of the last `"` or `'` before the cursor.
pub fn quotation_position(line: &str, col: u32) -> Option<u32> {
    let before = text_to_position(line, col);
    let byte = before.rfind(['"', '\''])?;
    Some(byte_col_to_utf16_col(line, byte) as u32)
}

/// Text between the last quote and the cursor; empty when no quote precedes
/// the cursor.
pub fn text_within_string(line: &str, col: u32) -> String {
    let before = text_to_position(line, col);
    match before.rfind(['"', '\'']) {
        Some(byte) => before[byte + 1..].to_string(),
        None => String::new(),
    }
}

pub fn is_import_export_or_require(line: &str) -> bool {
    IMPORT_LIKE.is_match(line)
}

/// Range replaced by a completion: from just after the last `/` (or the
/// opening quote, whichever is later) up to the cursor.
pub fn import_range(line_no: u32, line: &str, col: u32) -> TextRange {
    let before = text_to_position(line, col);
    let start = before
        .rfind(['/', '"', '\''])
        .map(|byte| byte_col_to_utf16_col(line, byte + 1) as u32)
        .unwrap_or(0);
    TextRange::new(line_no, start, col.min(byte_col_to_utf16_col(line, before.len()) as u32))
}

/// Range from just after the opening quote to the cursor.
pub fn string_start_range(line_no: u32, line: &str, col: u32) -> TextRange {
    let end = byte_col_to_utf16_col(line, text_to_position(line, col).len()) as u32;
    let start = quotation_position(line, col).map(|q| q + 1).unwrap_or(end);
    TextRange::new(line_no, start, end)
}

/// Extension used to decide whether sibling files lose theirs on insert.
/// Untitled documents and extensions longer than three characters have none.
pub fn document_extension(file_name: &Path, untitled: bool) -> Option<String> {
    if untitled {
        return None;
    }
    let extension = file_name.extension()?.to_str()?;
    if extension.is_empty() || extension.len() > 3 {
        return None;
    }
    Some(extension.to_string())
}
