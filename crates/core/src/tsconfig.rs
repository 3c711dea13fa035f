use crate::config::Mapping;
use crate::error::{PathsenseError, Result};
use crate::resolve::normalize_path;
use jsonc_parser::ParseOptions;
use serde_json::Value;
use std::path::Path;

const CONFIG_FILES: [&str; 2] = ["tsconfig.json", "jsconfig.json"];

/// Reads the project's path-mapping file from `root`. A missing or
/// unparsable file yields `None`.
pub async fn read_ts_config(root: &Path) -> Option<Value> {
    for name in CONFIG_FILES {
        let path = root.join(name);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(_) => continue,
        };
        match parse_jsonc(&content) {
            Ok(value) => {
                tracing::debug!("Loaded {}", path.display());
                return Some(value);
            }
            Err(e) => {
                tracing::warn!("Ignoring unparsable {}: {}", path.display(), e);
                return None;
            }
        }
    }
    None
}

/// Parses JSON that may contain `//`/`/* */` comments and trailing commas,
/// as tsconfig files commonly do. A leading byte order mark is ignored.
pub fn parse_jsonc(content: &str) -> Result<Value> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let options = ParseOptions {
        allow_comments: true,
        allow_trailing_commas: true,
        ..Default::default()
    };
    jsonc_parser::parse_to_serde_value(content, &options)
        .map_err(|e| PathsenseError::Config(e.to_string()))?
        .ok_or_else(|| PathsenseError::Config("empty document".to_string()))
}

/// Turns `compilerOptions.paths` into mappings:
/// `"@/*": ["src/*"]` with `baseUrl: "."` becomes `@ -> <root>/src`.
pub fn ts_config_mappings(tsconfig: &Value, root: &Path) -> Vec<Mapping> {
    let Some(options) = tsconfig.get("compilerOptions") else {
        return Vec::new();
    };
    let base_url = options
        .get("baseUrl")
        .and_then(Value::as_str)
        .unwrap_or(".");
    let Some(Value::Object(paths)) = options.get("paths") else {
        return Vec::new();
    };

    let base = root.join(base_url);
    paths
        .iter()
        .filter_map(|(alias, targets)| {
            let key = strip_wildcard(alias);
            if key.is_empty() || key == "*" {
                return None;
            }
            let target = targets.as_array()?.iter().find_map(Value::as_str)?;
            let value = normalize_path(&base.join(strip_wildcard(target)));
            Some(Mapping::new(key, value))
        })
        .collect()
}

fn strip_wildcard(pattern: &str) -> &str {
    let trimmed = pattern.strip_suffix("/*").unwrap_or(pattern);
    trimmed.strip_suffix('/').unwrap_or(trimmed)
}
