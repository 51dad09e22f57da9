//! Conversation management API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use chatvault_common::{Error, Pagination, Result, UserId, ValidatedJson};
use chatvault_core::{Conversation, FileAttachment, Message, Metadata};

use crate::handlers::{ensure_owner, load_conversation};
use crate::state::VaultState;

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Optional explicit title
    #[validate(length(max = 200))]
    pub title: Option<String>,

    /// Optional initial metadata
    pub metadata: Option<Metadata>,
}

/// Request for updating a conversation (rename, metadata merge)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConversationRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    pub metadata: Option<Metadata>,
}

/// Query params for listing conversations
#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
    /// Current conversation to pin for anonymous callers
    pub conversation_id: Option<Uuid>,
}

/// Summary of a conversation for list views
#[derive(Debug, Serialize)]
pub struct ConversationSummary {
    pub conversation_id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub message_count: usize,
    pub file_count: usize,
}

impl From<&Conversation> for ConversationSummary {
    fn from(c: &Conversation) -> Self {
        Self {
            conversation_id: c.conversation_id(),
            title: c.title().to_string(),
            created_at: c.created_at(),
            last_active: c.last_active(),
            message_count: c.get_messages().len(),
            file_count: c.get_files().len(),
        }
    }
}

/// List response wrapper
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
}

/// Full conversation detail DTO
#[derive(Debug, Serialize)]
pub struct ConversationDetailResponse {
    pub conversation_id: Uuid,
    pub user_id: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub messages: Vec<Message>,
    pub files: Vec<FileAttachment>,
    pub metadata: Metadata,
}

impl From<&Conversation> for ConversationDetailResponse {
    fn from(c: &Conversation) -> Self {
        Self {
            conversation_id: c.conversation_id(),
            user_id: c.user_id().map(str::to_string),
            title: c.title().to_string(),
            created_at: c.created_at(),
            last_active: c.last_active(),
            messages: c.get_messages().to_vec(),
            files: c.get_files().to_vec(),
            metadata: c.metadata().clone(),
        }
    }
}

/// List conversations for the caller.
///
/// Authenticated callers get all of their conversations; anonymous callers
/// may pass `conversation_id` to see the thread they are currently in. The
/// pinned conversation is always included even for authenticated callers.
/// Supports `limit`/`offset` query parameters, applied after sorting.
pub async fn list_conversations(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Query(query): Query<ListConversationsQuery>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ConversationListResponse>> {
    let mut conversations = match &user_id {
        Some(user_id) => state.vault.get_user_conversations(user_id).await?,
        None => Vec::new(),
    };

    if let Some(pinned_id) = query.conversation_id {
        let already_listed = conversations
            .iter()
            .any(|c| c.conversation_id() == pinned_id);
        if !already_listed {
            if let Some(pinned) = state.vault.get_conversation(pinned_id).await? {
                conversations.insert(0, pinned);
            }
        }
    }

    conversations.sort_by(|a, b| b.last_active().cmp(&a.last_active()));

    Ok(Json(ConversationListResponse {
        conversations: conversations
            .iter()
            .skip(pagination.offset())
            .take(pagination.limit())
            .map(Into::into)
            .collect(),
    }))
}

/// Create a new conversation
pub async fn create_conversation(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationDetailResponse>)> {
    let metadata = req.metadata.unwrap_or_default();
    let mut conversation = state
        .vault
        .create_conversation(user_id.as_deref(), metadata)
        .await?;

    if let Some(title) = req.title {
        conversation.rename(title).await?;
    }

    Ok((StatusCode::CREATED, Json((&conversation).into())))
}

/// Get a conversation by ID
pub async fn get_conversation(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationDetailResponse>> {
    let conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;
    Ok(Json((&conversation).into()))
}

/// Update a conversation (rename, merge metadata)
pub async fn update_conversation(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateConversationRequest>,
) -> Result<Json<ConversationDetailResponse>> {
    let mut conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    if let Some(title) = req.title {
        conversation.rename(title).await?;
    }

    if let Some(metadata) = req.metadata {
        conversation.metadata_mut().extend(metadata);
        conversation.save().await?;
    }

    Ok(Json((&conversation).into()))
}

/// Delete a conversation and all its files
pub async fn delete_conversation(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    if !state.vault.delete_conversation(id).await? {
        return Err(Error::Internal("Failed to delete conversation".to_string()));
    }
    tracing::info!(conversation_id = %id, "Conversation deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Conversation deleted",
    })))
}
