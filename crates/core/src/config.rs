use crate::error::{PathsenseError, Result};
use crate::tsconfig::ts_config_mappings;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Settings section read from the host.
pub const SETTINGS_SECTION: &str = "path-intellisense";

/// A typed prefix that redirects a path fragment to another directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub key: String,
    pub value: PathBuf,
    /// Set for entries derived from the package manifest.
    pub npm: bool,
}

impl Mapping {
    pub fn new(key: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            npm: false,
        }
    }

    pub fn npm(key: impl Into<String>, value: impl Into<PathBuf>) -> Self {
        Self {
            npm: true,
            ..Self::new(key, value)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PathIntellisenseSettings {
    auto_slash_after_directory: bool,
    show_hidden_files: bool,
    extension_on_import: bool,
    absolute_path_to_workspace: bool,
    /// Kept in the order the host wrote them; ties in alias matching go to
    /// the earlier entry.
    mappings: IndexMap<String, String>,
}

impl Default for PathIntellisenseSettings {
    fn default() -> Self {
        Self {
            auto_slash_after_directory: false,
            show_hidden_files: false,
            extension_on_import: false,
            absolute_path_to_workspace: true,
            mappings: IndexMap::new(),
        }
    }
}

/// Compiled `files.exclude` globs.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl ExcludeMatcher {
    pub fn empty() -> Self {
        Self {
            set: GlobSet::empty(),
        }
    }

    /// Compiles every enabled pattern, anchored at `root` when one is known.
    /// Patterns that fail to compile are skipped.
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>, root: Option<&Path>) -> Self {
        let mut builder = GlobSetBuilder::new();
        let mut count = 0;
        for pattern in patterns {
            let anchored = match root {
                Some(root) => {
                    let root = globset::escape(&root.to_string_lossy());
                    format!("{}/{}", root.trim_end_matches('/'), pattern)
                }
                None => pattern.to_string(),
            };
            let anchored = anchored.trim_end_matches('/');
            match compile_glob(anchored) {
                Ok(glob) => {
                    builder.add(glob);
                    count += 1;
                }
                Err(e) => tracing::warn!("Skipping files.exclude pattern '{}': {}", pattern, e),
            }
        }

        if count == 0 {
            return Self::empty();
        }

        match builder.build() {
            Ok(set) => Self { set },
            Err(e) => {
                tracing::warn!("Failed to build files.exclude matcher: {}", e);
                Self::empty()
            }
        }
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.set.is_match(path)
    }
}

fn compile_glob(pattern: &str) -> Result<globset::Glob> {
    Ok(GlobBuilder::new(pattern).literal_separator(true).build()?)
}

/// Snapshot of everything a completion request needs to know about the
/// host. It is rebuilt from scratch whenever settings change.
#[derive(Debug, Clone)]
pub struct Config {
    pub auto_slash_after_directory: bool,
    pub show_hidden_files: bool,
    pub with_extension: bool,
    pub absolute_path_to_workspace: bool,
    pub files_exclude: BTreeMap<String, bool>,
    pub mappings: Vec<Mapping>,
    pub workspace_root: Option<PathBuf>,
    exclude: ExcludeMatcher,
}

impl Default for Config {
    fn default() -> Self {
        let settings = PathIntellisenseSettings::default();
        Self {
            auto_slash_after_directory: settings.auto_slash_after_directory,
            show_hidden_files: settings.show_hidden_files,
            with_extension: settings.extension_on_import,
            absolute_path_to_workspace: settings.absolute_path_to_workspace,
            files_exclude: BTreeMap::new(),
            mappings: Vec::new(),
            workspace_root: None,
            exclude: ExcludeMatcher::empty(),
        }
    }
}

impl Config {
    /// Builds the snapshot from the host settings payload
    /// (`{"path-intellisense": {..}, "files": {"exclude": {..}}}`), an
    /// optional parsed tsconfig and the workspace root.
    pub fn from_settings(settings: &Value, tsconfig: Option<&Value>, root: Option<&Path>) -> Self {
        let section = parse_section(settings).unwrap_or_else(|e| {
            tracing::warn!("{}, using defaults", e);
            PathIntellisenseSettings::default()
        });

        let files_exclude = files_exclude(settings);

        let mut mappings: Vec<Mapping> = section
            .mappings
            .iter()
            .map(|(key, value)| Mapping::new(key.clone(), expand_mapping_value(value, root)))
            .collect();

        if let (Some(tsconfig), Some(root)) = (tsconfig, root) {
            mappings.extend(ts_config_mappings(tsconfig, root));
        }

        let exclude = ExcludeMatcher::new(
            files_exclude
                .iter()
                .filter(|(_, enabled)| **enabled)
                .map(|(pattern, _)| pattern.as_str()),
            root,
        );

        tracing::debug!(
            "Configuration rebuilt: {} mappings, {} exclude patterns",
            mappings.len(),
            files_exclude.len()
        );

        Self {
            auto_slash_after_directory: section.auto_slash_after_directory,
            show_hidden_files: section.show_hidden_files,
            with_extension: section.extension_on_import,
            absolute_path_to_workspace: section.absolute_path_to_workspace,
            files_exclude,
            mappings,
            workspace_root: root.map(Path::to_path_buf),
            exclude,
        }
    }

    /// Copy of this snapshot with `extra` appended to the mappings.
    pub fn with_extra_mappings(&self, extra: Vec<Mapping>) -> Self {
        let mut config = self.clone();
        config.mappings.extend(extra);
        config
    }

    pub fn exclude_matcher(&self) -> &ExcludeMatcher {
        &self.exclude
    }

    /// The root that `/`-prefixed fragments resolve against, if enabled.
    pub fn absolute_root(&self) -> Option<&Path> {
        if self.absolute_path_to_workspace {
            self.workspace_root.as_deref()
        } else {
            None
        }
    }
}

fn parse_section(settings: &Value) -> Result<PathIntellisenseSettings> {
    match settings.get(SETTINGS_SECTION) {
        None | Some(Value::Null) => Ok(PathIntellisenseSettings::default()),
        Some(section) => PathIntellisenseSettings::deserialize(section).map_err(|e| {
            PathsenseError::Config(format!("invalid {} settings: {}", SETTINGS_SECTION, e))
        }),
    }
}

/// `files.exclude` accepts both the nested and the dotted key. A value counts
/// as enabled unless it is `false` or `null`; `{"when": ..}` clauses are
/// treated as enabled.
fn files_exclude(settings: &Value) -> BTreeMap<String, bool> {
    let raw = settings
        .get("files")
        .and_then(|files| files.get("exclude"))
        .or_else(|| settings.get("files.exclude"));

    let Some(Value::Object(map)) = raw else {
        return BTreeMap::new();
    };

    map.iter()
        .map(|(pattern, value)| {
            let enabled = !matches!(value, Value::Bool(false) | Value::Null);
            (pattern.clone(), enabled)
        })
        .collect()
}

fn expand_mapping_value(value: &str, root: Option<&Path>) -> PathBuf {
    let expanded = match root {
        Some(root) => {
            let root = root.to_string_lossy();
            value
                .replace("${workspaceRoot}", &root)
                .replace("${workspaceFolder}", &root)
        }
        None => value.to_string(),
    };

    let path = PathBuf::from(expanded);
    match root {
        Some(root) if path.is_relative() => crate::resolve::normalize_path(&root.join(path)),
        _ => crate::resolve::normalize_path(&path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_settings_are_missing() {
        let config = Config::from_settings(&Value::Null, None, None);
        assert!(!config.auto_slash_after_directory);
        assert!(!config.show_hidden_files);
        assert!(!config.with_extension);
        assert!(config.absolute_path_to_workspace);
        assert!(config.mappings.is_empty());
    }

    #[test]
    fn reads_flags_and_expands_mappings() {
        let settings = json!({
            "path-intellisense": {
                "autoSlashAfterDirectory": true,
                "extensionOnImport": true,
                "absolutePathToWorkspace": false,
                "mappings": {
                    "@": "${workspaceRoot}/src",
                    "lib": "vendor/lib",
                    "abs": "/opt/shared"
                }
            }
        });
        let config = Config::from_settings(&settings, None, Some(Path::new("/work")));

        assert!(config.auto_slash_after_directory);
        assert!(config.with_extension);
        assert!(!config.absolute_path_to_workspace);
        assert_eq!(config.absolute_root(), None);

        let find = |key: &str| config.mappings.iter().find(|m| m.key == key).unwrap();
        assert_eq!(find("@").value, PathBuf::from("/work/src"));
        assert_eq!(find("lib").value, PathBuf::from("/work/vendor/lib"));
        assert_eq!(find("abs").value, PathBuf::from("/opt/shared"));
    }

    #[test]
    fn invalid_section_falls_back_to_defaults() {
        let settings = json!({ "path-intellisense": { "showHiddenFiles": "yes" } });
        assert!(matches!(parse_section(&settings), Err(PathsenseError::Config(_))));

        let config = Config::from_settings(&settings, None, None);
        assert!(!config.show_hidden_files);
        assert!(config.absolute_path_to_workspace);
    }

    #[test]
    fn null_section_is_default() {
        let settings = json!({ "path-intellisense": null });
        assert!(parse_section(&settings).unwrap().absolute_path_to_workspace);
    }

    #[test]
    fn mappings_keep_host_order() {
        let settings = json!({
            "path-intellisense": { "mappings": { "~/z": "z", "~": "a", "@": "b" } }
        });
        let config = Config::from_settings(&settings, None, Some(Path::new("/work")));
        let keys: Vec<&str> = config.mappings.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["~/z", "~", "@"]);
    }

    #[test]
    fn tsconfig_mappings_follow_user_mappings() {
        let settings = json!({ "path-intellisense": { "mappings": { "~": "src" } } });
        let tsconfig = json!({
            "compilerOptions": { "baseUrl": ".", "paths": { "@app/*": ["app/*"] } }
        });
        let config = Config::from_settings(&settings, Some(&tsconfig), Some(Path::new("/work")));
        let keys: Vec<&str> = config.mappings.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["~", "@app"]);
    }

    #[test]
    fn exclude_globs_are_anchored_at_root() {
        let settings = json!({
            "files": { "exclude": { "**/*.js": true, "build": true, "dist/": true, "tmp": false } }
        });
        let config = Config::from_settings(&settings, None, Some(Path::new("/work")));
        let matcher = config.exclude_matcher();

        assert!(matcher.is_excluded(Path::new("/work/src/a.js")));
        assert!(matcher.is_excluded(Path::new("/work/build")));
        assert!(matcher.is_excluded(Path::new("/work/dist")));
        assert!(!matcher.is_excluded(Path::new("/work/src/build")));
        assert!(!matcher.is_excluded(Path::new("/work/tmp")));
        assert!(!matcher.is_excluded(Path::new("/work/src/a.ts")));
    }

    #[test]
    fn root_with_glob_metacharacters_is_matched_literally() {
        let settings = json!({ "files": { "exclude": { "build": true, "*.log": true } } });
        let root = Path::new("/work/app[1]");
        let config = Config::from_settings(&settings, None, Some(root));
        let matcher = config.exclude_matcher();

        assert!(matcher.is_excluded(Path::new("/work/app[1]/build")));
        assert!(matcher.is_excluded(Path::new("/work/app[1]/out.log")));
        assert!(!matcher.is_excluded(Path::new("/work/app1/build")));
    }

    #[test]
    fn dotted_files_exclude_key_is_accepted() {
        let settings = json!({ "files.exclude": { "*.log": true } });
        let config = Config::from_settings(&settings, None, Some(Path::new("/work")));
        assert!(config.exclude_matcher().is_excluded(Path::new("/work/out.log")));
        assert!(!config.exclude_matcher().is_excluded(Path::new("/work/logs/out.log")));
    }

    #[test]
    fn extra_mappings_are_appended_to_a_copy() {
        let config = Config::from_settings(
            &json!({ "path-intellisense": { "mappings": { "@": "/src" } } }),
            None,
            None,
        );
        let extended = config.with_extra_mappings(vec![Mapping::npm("react", "/nm/react")]);
        assert_eq!(config.mappings.len(), 1);
        assert_eq!(extended.mappings.len(), 2);
        assert!(extended.mappings[1].npm);
    }
}
