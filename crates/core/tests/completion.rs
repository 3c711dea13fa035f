use pathsense_core::{CompletionInput, CompletionKind, Config, PathCompletion, TextRange, complete};
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/lib")).unwrap();
        fs::create_dir_all(root.join("assets/img")).unwrap();
        fs::create_dir_all(root.join("node_modules/react")).unwrap();
        fs::write(root.join("src/main.ts"), "").unwrap();
        fs::write(root.join("src/utils.ts"), "").unwrap();
        fs::write(root.join("src/style.css"), "").unwrap();
        fs::write(root.join("src/types.d.ts"), "").unwrap();
        fs::write(root.join("src/.eslintrc"), "").unwrap();
        fs::write(root.join("src/lib/math.ts"), "").unwrap();
        fs::write(root.join("assets/logo.svg"), "").unwrap();
        fs::write(root.join("node_modules/react/index.js"), "").unwrap();
        fs::write(
            root.join("package.json"),
            r#"{ "dependencies": { "react": "^18" }, "devDependencies": { "@types/react": "^18" } }"#,
        )
        .unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn main_file(&self) -> PathBuf {
        self.root().join("src/main.ts")
    }

    fn config(&self, settings: Value) -> Config {
        Config::from_settings(&settings, None, Some(self.root()))
    }

    async fn complete(&self, line: &str, config: &Config) -> Vec<PathCompletion> {
        let file = self.main_file();
        let input = CompletionInput {
            file_name: &file,
            untitled: false,
            line_text: line,
            line: 4,
            character: line.encode_utf16().count() as u32,
        };
        complete(&input, config).await
    }
}

fn summary(items: &[PathCompletion]) -> Vec<(&str, &str)> {
    items
        .iter()
        .map(|i| (i.label.as_str(), i.text_edit.new_text.as_str()))
        .collect()
}

fn labels(items: Vec<PathCompletion>) -> Vec<String> {
    items.into_iter().map(|i| i.label).collect()
}

#[tokio::test]
async fn relative_import_lists_siblings_and_strips_extensions() {
    let project = Project::new();
    let config = project.config(json!({}));
    let items = project.complete("import x from './", &config).await;

    assert_eq!(
        summary(&items),
        vec![
            ("..", ".."),
            ("lib/", "lib"),
            ("main.ts", "main"),
            ("style.css", "style.css"),
            ("utils.ts", "utils"),
        ]
    );

    let lib = &items[1];
    assert_eq!(lib.kind, CompletionKind::Folder);
    assert_eq!(lib.sort_text.as_deref(), Some("a_lib"));
    assert_eq!(lib.text_edit.range, TextRange::new(4, 17, 17));

    let utils = &items[4];
    assert_eq!(utils.kind, CompletionKind::File);
    assert_eq!(utils.sort_text.as_deref(), Some("b_utils.ts"));
    assert!(items[0].retrigger);
}

#[tokio::test]
async fn extensions_stay_when_configured() {
    let project = Project::new();
    let config = project.config(json!({ "path-intellisense": { "extensionOnImport": true } }));
    let items = project.complete("import x from './ut", &config).await;
    let utils = items.iter().find(|i| i.label == "utils.ts").unwrap();
    assert_eq!(utils.text_edit.new_text, "utils.ts");
    assert_eq!(utils.text_edit.range, TextRange::new(4, 17, 19));
}

#[tokio::test]
async fn plain_strings_keep_extensions() {
    let project = Project::new();
    let config = project.config(json!({}));
    let items = project.complete("const p = './lib/", &config).await;
    assert_eq!(summary(&items), vec![("..", ".."), ("math.ts", "math.ts")]);
}

#[tokio::test]
async fn auto_slash_appends_separator_to_directories() {
    let project = Project::new();
    let config = project.config(json!({ "path-intellisense": { "autoSlashAfterDirectory": true } }));
    let items = project.complete("import x from './", &config).await;
    assert_eq!(items[0].text_edit.new_text, "../");
    let lib = items.iter().find(|i| i.label == "lib/").unwrap();
    assert_eq!(lib.text_edit.new_text, "lib/");
}

#[tokio::test]
async fn hidden_and_excluded_entries_are_filtered() {
    let project = Project::new();

    let config = project.config(json!({ "files": { "exclude": { "**/*.css": true } } }));
    let found = labels(project.complete("import x from './", &config).await);
    assert!(!found.iter().any(|l| l == "style.css"));
    assert!(!found.iter().any(|l| l == ".eslintrc"));
    assert!(!found.iter().any(|l| l == "types.d.ts"));

    let config = project.config(json!({ "path-intellisense": { "showHiddenFiles": true } }));
    let found = labels(project.complete("import x from './", &config).await);
    assert!(found.iter().any(|l| l == ".eslintrc"));
    assert!(!found.iter().any(|l| l == "types.d.ts"));
}

#[tokio::test]
async fn aliases_resolve_to_their_target() {
    let project = Project::new();
    let config = project.config(json!({
        "path-intellisense": { "mappings": { "@": "${workspaceFolder}/src" } }
    }));
    let items = project.complete("import { add } from '@/lib/", &config).await;
    assert_eq!(summary(&items), vec![("..", ".."), ("math.ts", "math")]);
}

#[tokio::test]
async fn tsconfig_paths_act_as_aliases() {
    let project = Project::new();
    let tsconfig = json!({
        "compilerOptions": { "baseUrl": ".", "paths": { "~assets/*": ["assets/*"] } }
    });
    let config = Config::from_settings(&Value::Null, Some(&tsconfig), Some(project.root()));
    let items = project.complete("import logo from '~assets/", &config).await;
    assert_eq!(
        summary(&items),
        vec![("..", ".."), ("img/", "img"), ("logo.svg", "logo.svg")]
    );
}

#[tokio::test]
async fn absolute_fragments_start_at_workspace_root() {
    let project = Project::new();
    let config = project.config(json!({}));
    let items = project.complete("const logo = \"/assets/", &config).await;
    assert_eq!(
        summary(&items),
        vec![("..", ".."), ("img/", "img"), ("logo.svg", "logo.svg")]
    );
}

#[tokio::test]
async fn empty_import_offers_mappings_and_modules() {
    let project = Project::new();
    let config = project.config(json!({
        "path-intellisense": { "mappings": { "@": "${workspaceRoot}/src" } }
    }));
    let items = project.complete("import x from '", &config).await;

    assert_eq!(
        summary(&items),
        vec![("..", ".."), ("@/", "@"), ("react/", "react")]
    );
    assert_eq!(items[1].kind, CompletionKind::Folder);

    let react = &items[2];
    assert_eq!(react.kind, CompletionKind::Module);
    assert_eq!(react.sort_text.as_deref(), Some("c_react"));
    assert_eq!(react.text_edit.range, TextRange::new(4, 15, 15));
}

#[tokio::test]
async fn package_modules_are_listed_as_modules() {
    let project = Project::new();
    let config = project.config(json!({}));
    let items = project.complete("import React from 'react/", &config).await;

    let index = items.iter().find(|i| i.label == "index.js").unwrap();
    assert_eq!(index.kind, CompletionKind::Module);
    assert_eq!(index.sort_text.as_deref(), Some("c_index.js"));
    assert_eq!(index.text_edit.new_text, "index.js");
}

#[tokio::test]
async fn unrelated_contexts_get_nothing() {
    let project = Project::new();
    let config = project.config(json!({}));
    assert!(project.complete("import x from 'lodash/", &config).await.is_empty());
    assert!(project.complete("import x from '/assets/", &config).await.is_empty());
    assert!(project.complete("const s = '", &config).await.is_empty());
    assert!(project.complete("let n = 42", &config).await.is_empty());
}

#[tokio::test]
async fn missing_directories_only_offer_going_up() {
    let project = Project::new();
    let config = project.config(json!({}));
    let items = project.complete("import x from './nowhere/", &config).await;
    assert_eq!(summary(&items), vec![("..", "..")]);
}
