use pathsense_core::tsconfig::read_ts_config;
use pathsense_core::util::line_at;
use pathsense_core::{CompletionInput, Config, PathsenseError, complete};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CompleteArgs {
    pub file: PathBuf,
    pub line: u32,
    pub character: Option<u32>,
    pub text: Option<String>,
    pub root: PathBuf,
    pub settings: Option<PathBuf>,
}

pub async fn run(args: CompleteArgs) -> Result<(), Box<dyn std::error::Error>> {
    let file = absolute(&args.file)?;
    let root = absolute(&args.root)?;

    let line_text = match args.text {
        Some(text) => text,
        None => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .map_err(PathsenseError::from)?;
            line_at(&content, args.line as usize).to_string()
        }
    };
    let character = args
        .character
        .unwrap_or_else(|| line_text.encode_utf16().count() as u32);

    let config = load_config(&root, args.settings.as_deref()).await?;
    info!(
        "Completing {}:{}:{} with {} mappings",
        file.display(),
        args.line,
        character,
        config.mappings.len()
    );

    let input = CompletionInput {
        file_name: &file,
        untitled: false,
        line_text: &line_text,
        line: args.line,
        character,
    };
    let items = complete(&input, &config).await;
    info!("{} items", items.len());

    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

async fn load_config(root: &Path, settings: Option<&Path>) -> Result<Config, PathsenseError> {
    let settings = match settings {
        Some(path) => {
            let content = tokio::fs::read_to_string(path).await?;
            serde_json::from_str::<Value>(&content)?
        }
        None => Value::Null,
    };
    let tsconfig = read_ts_config(root).await;
    Ok(Config::from_settings(&settings, tsconfig.as_ref(), Some(root)))
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
