pub mod capabilities;
pub mod completion;
pub mod settings;
pub mod util;

use crate::util::Document;
use dashmap::DashMap;
use pathsense_core::Config;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

pub struct LspServer {
    client: Client,
    pub documents: DashMap<Url, Arc<Document>>,
    config: Arc<RwLock<Arc<Config>>>,
    settings: Arc<RwLock<Value>>,
    workspace_root: Arc<RwLock<Option<PathBuf>>>,
    pull_configuration: AtomicBool,
}

impl LspServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            documents: DashMap::new(),
            config: Arc::new(RwLock::new(Arc::new(Config::default()))),
            settings: Arc::new(RwLock::new(Value::Null)),
            workspace_root: Arc::new(RwLock::new(None)),
            pull_configuration: AtomicBool::new(false),
        }
    }

    /// Current configuration snapshot.
    pub async fn config(&self) -> Arc<Config> {
        self.config.read().await.clone()
    }

    /// Rebuilds the configuration snapshot from the last known settings and
    /// the project's tsconfig. `settings` replaces the stored payload when
    /// given.
    async fn refresh_config(&self, settings: Option<Value>) {
        if let Some(settings) = settings {
            *self.settings.write().await = settings;
        }

        let root = self.workspace_root.read().await.clone();
        let settings = self.settings.read().await.clone();
        let config = settings::build_config(&settings, root.as_deref()).await;
        let mapping_count = config.mappings.len();
        *self.config.write().await = Arc::new(config);

        tracing::info!("Configuration refreshed with {} mappings", mapping_count);
        self.client
            .log_message(
                MessageType::LOG,
                format!("Configuration refreshed: {} mappings", mapping_count),
            )
            .await;
    }

    /// Pulls our sections with `workspace/configuration`, when the client
    /// supports it.
    async fn pull_settings(&self) -> Option<Value> {
        if !self.pull_configuration.load(Ordering::Relaxed) {
            return None;
        }
        match self.client.configuration(settings::configuration_items()).await {
            Ok(values) => Some(settings::settings_from_sections(values)),
            Err(e) => {
                tracing::warn!("workspace/configuration failed: {}", e);
                None
            }
        }
    }
}

fn workspace_root(params: &InitializeParams) -> Option<PathBuf> {
    params
        .workspace_folders
        .as_ref()
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.uri.to_file_path().ok())
        .or_else(|| {
            params
                .root_uri
                .as_ref()
                .and_then(|uri| uri.to_file_path().ok())
        })
}

#[tower_lsp::async_trait]
impl LanguageServer for LspServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let root = workspace_root(&params);
        tracing::info!("Initializing with workspace root {:?}", root);
        *self.workspace_root.write().await = root;

        if let Some(options) = params.initialization_options.clone() {
            *self.settings.write().await = options;
        }

        let supports_pull = params
            .capabilities
            .workspace
            .as_ref()
            .and_then(|w| w.configuration)
            .unwrap_or(false);
        self.pull_configuration.store(supports_pull, Ordering::Relaxed);

        Ok(InitializeResult {
            server_info: Some(ServerInfo {
                name: "pathsense".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
            capabilities: capabilities::server_capabilities(),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let pulled = self.pull_settings().await;
        self.refresh_config(pulled).await;
    }

    async fn shutdown(&self) -> Result<()> {
        self.documents.clear();
        Ok(())
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.client
            .log_message(MessageType::LOG, "LSP Event: workspace/didChangeConfiguration")
            .await;
        let settings = match settings::pushed_settings(&params.settings) {
            Some(settings) => Some(settings),
            None => self.pull_settings().await,
        };
        self.refresh_config(settings).await;
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let doc = params.text_document;
        self.documents
            .insert(doc.uri, Arc::new(Document::new(doc.text, doc.version)));
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        if let Some(mut doc_ref) = self.documents.get_mut(&uri) {
            let doc = doc_ref.value_mut();
            match doc.changed(version, &params.content_changes) {
                Some(next) => *doc = Arc::new(next),
                None => tracing::debug!("Ignoring stale change to {} (version {})", uri, version),
            }
        }
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if util::is_project_config(&params.text_document.uri) {
            self.refresh_config(None).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = &params.text_document_position.text_document.uri;
        let pos = params.text_document_position.position;
        self.client
            .log_message(
                MessageType::LOG,
                format!(
                    "LSP Request: textDocument/completion uri={} pos={}:{}",
                    uri, pos.line, pos.character
                ),
            )
            .await;
        let result = completion::completion(self, params).await;
        match &result {
            Ok(Some(CompletionResponse::Array(items))) => {
                self.client
                    .log_message(
                        MessageType::LOG,
                        format!("LSP Response: {} path completions", items.len()),
                    )
                    .await
            }
            Ok(_) => {
                self.client
                    .log_message(MessageType::LOG, "LSP Response: no path completions")
                    .await
            }
            Err(e) => {
                self.client
                    .log_message(MessageType::ERROR, format!("LSP Error: {}", e))
                    .await
            }
        }
        result
    }
}

pub async fn run_server() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = tower_lsp::LspService::new(LspServer::new);
    tower_lsp::Server::new(stdin, stdout, socket)
        .serve(service)
        .await;

    Ok(())
}
