use crate::config::Mapping;
use serde_json::Value;
use std::path::Path;

const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// One mapping per declared dependency of `root/package.json`, pointing at
/// its `node_modules` directory. `@types/*` packages are skipped.
///
/// Read on every request: packages can be installed at any time.
pub async fn npm_module_mappings(root: &Path) -> Vec<Mapping> {
    let manifest = root.join("package.json");
    let content = match tokio::fs::read_to_string(&manifest).await {
        Ok(content) => content,
        Err(e) => {
            tracing::trace!("No package manifest at {}: {}", manifest.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(pkg) => mappings_from_manifest(&pkg, root),
        Err(e) => {
            tracing::warn!("Ignoring unparsable {}: {}", manifest.display(), e);
            Vec::new()
        }
    }
}

pub fn mappings_from_manifest(pkg: &Value, root: &Path) -> Vec<Mapping> {
    let modules = root.join("node_modules");
    DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| pkg.get(section).and_then(Value::as_object))
        .flat_map(|deps| deps.keys())
        .filter(|name| !name.starts_with("@types"))
        .map(|name| Mapping::npm(name.clone(), modules.join(name)))
        .collect()
}
