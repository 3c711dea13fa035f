use pathsense_core::Config;
use pathsense_core::config::SETTINGS_SECTION;
use pathsense_core::tsconfig::read_ts_config;
use serde_json::{Map, Value};
use std::path::Path;
use tower_lsp::lsp_types::ConfigurationItem;

pub const FILES_SECTION: &str = "files";

/// Settings pushed with `workspace/didChangeConfiguration`, if the payload
/// actually carries one of our sections. Many clients send `null` and expect
/// the server to pull instead.
pub fn pushed_settings(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    if map.contains_key(SETTINGS_SECTION)
        || map.contains_key(FILES_SECTION)
        || map.contains_key("files.exclude")
    {
        Some(value.clone())
    } else {
        None
    }
}

pub fn configuration_items() -> Vec<ConfigurationItem> {
    [SETTINGS_SECTION, FILES_SECTION]
        .into_iter()
        .map(|section| ConfigurationItem {
            scope_uri: None,
            section: Some(section.to_string()),
        })
        .collect()
}

/// Reassembles the answers to [`configuration_items`] into the nested
/// payload shape `Config::from_settings` reads.
pub fn settings_from_sections(values: Vec<Value>) -> Value {
    let mut values = values.into_iter();
    let section = values.next().unwrap_or(Value::Null);
    let files = values.next().unwrap_or(Value::Null);
    let mut settings = Map::new();
    settings.insert(SETTINGS_SECTION.to_string(), section);
    settings.insert(FILES_SECTION.to_string(), files);
    Value::Object(settings)
}

/// A fresh snapshot from `settings` and the project's tsconfig. Nothing from
/// the previous snapshot carries over.
pub async fn build_config(settings: &Value, root: Option<&Path>) -> Config {
    let tsconfig = match root {
        Some(root) => read_ts_config(root).await,
        None => None,
    };
    Config::from_settings(settings, tsconfig.as_ref(), root)
}
