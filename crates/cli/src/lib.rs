mod complete;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pathsense",
    version,
    about = "File path completion for import and string literals",
    long_about = "pathsense proposes filesystem entries while a path is typed inside a string \
                  literal, resolving relative paths, workspace-absolute paths and configured \
                  aliases. It runs as a language server or answers one-off queries."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the Language Server Protocol (LSP) server on stdio
    Lsp,
    /// Print the completions offered at a position of a file
    #[command(
        long_about = "Runs a single completion request against a file on disk and prints the \
                            items as JSON. Useful to check aliases and exclusion rules."
    )]
    Complete {
        /// File the cursor is in
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Zero-based line of the cursor
        #[arg(long, default_value_t = 0)]
        line: u32,

        /// Zero-based UTF-16 column of the cursor. Defaults to the end of the line.
        #[arg(long)]
        character: Option<u32>,

        /// Use this text as the cursor line instead of reading FILE
        #[arg(long, value_name = "LINE")]
        text: Option<String>,

        /// Workspace root. Defaults to the current directory.
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// JSON settings file, shaped like `{"path-intellisense": {..}, "files": {..}}`
        #[arg(long, value_name = "SETTINGS_JSON")]
        settings: Option<PathBuf>,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The language server owns stdio, so it logs to file only.
    let _guard = match &cli.command {
        Commands::Lsp => pathsense_core::logging::init_logging("lsp", false),
        Commands::Complete { .. } => pathsense_core::logging::init_logging("cli", true),
    };

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Lsp => {
            rt.block_on(pathsense_lsp::run_server())?;
            Ok(())
        }
        Commands::Complete {
            file,
            line,
            character,
            text,
            root,
            settings,
        } => {
            let root = match root {
                Some(root) => root,
                None => std::env::current_dir()?,
            };
            rt.block_on(complete::run(complete::CompleteArgs {
                file,
                line,
                character,
                text,
                root,
                settings,
            }))
        }
    }
}
