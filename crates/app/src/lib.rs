//! ChatVault application composition root
//!
//! Builds the configured backends, binds them into a vault, and composes the
//! API router. Backend wiring is explicit configuration, not a registry:
//! unknown backend names fail startup.

use std::sync::Arc;

use axum::Router;

use chatvault_api::VaultState;
use chatvault_common::Config;
use chatvault_core::{ChatVault, FilesBackend, LocalFiles, MemoryMessages, MessagesBackend};

/// Build a vault from configuration
pub fn create_vault(config: &Config) -> Result<ChatVault, anyhow::Error> {
    let messages: Arc<dyn MessagesBackend> = match config.messages_backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory messages backend (data lost on restart)");
            Arc::new(MemoryMessages::new())
        }
        other => anyhow::bail!("Unknown messages backend: {other}"),
    };

    let files: Arc<dyn FilesBackend> = match config.files_backend.as_str() {
        "local" => {
            tracing::info!(path = %config.uploads_path, "Using local files backend");
            Arc::new(LocalFiles::new(config.uploads_path.clone()))
        }
        other => anyhow::bail!("Unknown files backend: {other}"),
    };

    Ok(ChatVault::new(messages, files))
}

/// Create the main application router with all routes
pub fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let vault = create_vault(config)?;
    let state = VaultState::new(vault);

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "ChatVault API v0.1.0" }),
        )
        .merge(chatvault_api::routes().with_state(state));

    Ok(app)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
