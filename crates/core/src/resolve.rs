use crate::config::Mapping;
use std::path::{Component, Path, PathBuf};

/// Lexically normalises a typed fragment: `.` segments and duplicate
/// separators are dropped, `a/..` collapses, a trailing separator survives.
/// Backslashes are treated as separators. An empty fragment becomes `.`.
pub fn normalize(text: &str) -> String {
    let text = text.replace('\\', "/");
    let absolute = text.starts_with('/');
    let trailing = text.ends_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in text.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if !absolute => segments.push(".."),
                _ => {}
            },
            other => segments.push(other),
        }
    }

    let mut out = if absolute { String::from("/") } else { String::new() };
    out.push_str(&segments.join("/"));
    if out.is_empty() {
        out.push('.');
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Lexical normalisation of a filesystem path; no symlinks are resolved.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// The mapping whose key, followed by a separator, prefixes `text`. Longer
/// keys win; among equal lengths the earliest mapping wins.
pub fn find_mapping<'a>(text: &str, mappings: &'a [Mapping]) -> Option<&'a Mapping> {
    let mut best: Option<(&Mapping, usize)> = None;
    for mapping in mappings {
        let prefix = if mapping.key.ends_with('/') {
            mapping.key.clone()
        } else {
            format!("{}/", mapping.key)
        };
        if !text.starts_with(&prefix) {
            continue;
        }
        if best.is_none_or(|(_, len)| prefix.len() > len) {
            best = Some((mapping, prefix.len()));
        }
    }
    best.map(|(mapping, _)| mapping)
}

/// Directory to list for `text`, typed inside a string in `file_name`.
///
/// Only the part of the fragment up to its last separator counts; the rest
/// is what the user is still typing. `root` is the directory `/`-prefixed
/// fragments resolve against (`None` means the filesystem root).
pub fn get_path(file_name: &Path, text: &str, root: Option<&Path>, mappings: &[Mapping]) -> PathBuf {
    let normalized = normalize(text);
    let is_absolute = normalized.starts_with('/');

    let mut base = file_name
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut entered = normalized.as_str();

    if let Some(mapping) = find_mapping(&normalized, mappings) {
        tracing::trace!("Fragment '{}' matched mapping '{}'", text, mapping.key);
        base = mapping.value.clone();
        entered = &normalized[mapping.key.len()..];
    }

    if is_absolute {
        base = root
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));
    }

    let directory_part = match entered.rfind('/') {
        Some(idx) => &entered[..=idx],
        None => "",
    };

    let mut dir = base;
    for segment in directory_part.split('/').filter(|s| !s.is_empty()) {
        dir.push(segment);
    }
    normalize_path(&dir)
}
