//! Message API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use chatvault_common::{Result, UserId, ValidatedJson};
use chatvault_core::{MessageRole, Metadata};

use crate::handlers::{ensure_owner, load_conversation};
use crate::state::VaultState;

/// Request to append a message
#[derive(Debug, Deserialize, Validate)]
pub struct AddMessageRequest {
    pub role: MessageRole,

    #[validate(length(min = 1))]
    pub content: String,

    pub metadata: Option<Metadata>,
}

/// Response after adding a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append a message to a conversation
pub async fn add_message(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AddMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let mut conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    let message = conversation
        .add_message_with(req.role, req.content, req.metadata.unwrap_or_default())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            role: message.role,
            content: message.content,
            timestamp: message.timestamp,
        }),
    ))
}
