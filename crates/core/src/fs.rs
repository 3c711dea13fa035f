use crate::config::{Config, Mapping};
use std::path::{Component, Path, PathBuf};

/// A directory entry offered for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub dir: PathBuf,
    pub file: String,
    /// `false` both for directories and for entries that could not be
    /// stat'ed (e.g. a mapping whose target does not exist).
    pub is_file: bool,
}

impl FileInfo {
    pub async fn stat(dir: impl Into<PathBuf>, file: impl Into<String>) -> Self {
        let dir = dir.into();
        let file = file.into();
        let is_file = tokio::fs::metadata(dir.join(&file))
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        Self { dir, file, is_file }
    }

    pub fn is_npm_module(&self) -> bool {
        self.dir
            .components()
            .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
    }
}

/// Lists `dir`, dropping entries hidden by `config`. Any read error yields an
/// empty list.
pub async fn list_children(dir: &Path, config: &Config) -> Vec<FileInfo> {
    let names = match read_dir_names(dir).await {
        Ok(names) => names,
        Err(e) => {
            tracing::debug!("Cannot list {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut children = Vec::with_capacity(names.len());
    for name in names {
        if filter_file(dir, &name, config) {
            children.push(FileInfo::stat(dir, name).await);
        }
    }
    children
}

async fn read_dir_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Whether `name` inside `dir` should be offered.
pub fn filter_file(dir: &Path, name: &str, config: &Config) -> bool {
    if name.ends_with(".d.ts") {
        return false;
    }
    if config.show_hidden_files {
        return true;
    }
    !is_file_hidden(dir, name, config)
}

fn is_file_hidden(dir: &Path, name: &str, config: &Config) -> bool {
    name.starts_with('.') || config.exclude_matcher().is_excluded(&dir.join(name))
}

/// One entry per mapping target, offered when nothing has been typed yet.
pub async fn mapping_entries(mappings: &[Mapping]) -> Vec<(Mapping, FileInfo)> {
    let mut entries = Vec::with_capacity(mappings.len());
    for mapping in mappings {
        let dir = mapping
            .value
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let file = mapping
            .value
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        entries.push((mapping.clone(), FileInfo::stat(dir, file).await));
    }
    entries
}
