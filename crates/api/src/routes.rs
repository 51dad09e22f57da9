//! Route definitions for the ChatVault API

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{conversations, files, messages};
use crate::state::VaultState;

/// Create conversation routes
fn conversation_routes() -> Router<VaultState> {
    Router::new()
        .route(
            "/v1/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/v1/conversations/{id}",
            get(conversations::get_conversation)
                .patch(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
}

/// Create message routes
fn message_routes() -> Router<VaultState> {
    Router::new().route(
        "/v1/conversations/{id}/messages",
        post(messages::add_message),
    )
}

/// Create file routes
fn file_routes() -> Router<VaultState> {
    Router::new()
        .route(
            "/v1/conversations/{id}/files",
            get(files::list_files).post(files::upload_file),
        )
        .route(
            "/v1/conversations/{id}/files/{filename}",
            get(files::get_file_url).delete(files::delete_file),
        )
}

/// Create all ChatVault API routes
pub fn routes() -> Router<VaultState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
        .merge(file_routes())
}
