//! File attachment API handlers

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use chatvault_common::{Error, Result, UserId};
use chatvault_core::FileAttachment;

use crate::handlers::{ensure_owner, load_conversation};
use crate::state::VaultState;

/// Default URL lifetime in seconds
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Query params for download URL issuance
#[derive(Debug, Deserialize)]
pub struct FileUrlQuery {
    pub expires_in: Option<u64>,
}

/// Response after uploading a file
#[derive(Debug, Serialize)]
pub struct UploadFileResponse {
    pub filename: String,
    pub size: u64,
    pub content_type: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

/// Attachment list response
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileAttachment>,
}

/// Download URL response
#[derive(Debug, Serialize)]
pub struct FileUrlResponse {
    pub download_url: String,
    pub expires_in: u64,
}

/// Upload a file to a conversation (multipart `file` field)
pub async fn upload_file(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadFileResponse>)> {
    let mut conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| Error::Validation("Missing filename".to_string()))?;
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| Error::Validation(format!("Failed to read upload: {e}")))?;

        let attachment = conversation
            .attach_file(&filename, &content, &content_type)
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(UploadFileResponse {
                filename: attachment.filename,
                size: attachment.size,
                content_type: attachment.content_type,
                uploaded_at: attachment.uploaded_at,
            }),
        ));
    }

    Err(Error::Validation(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// List all files in a conversation
pub async fn list_files(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileListResponse>> {
    let conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    Ok(Json(FileListResponse {
        files: conversation.get_files().to_vec(),
    }))
}

/// Get a download URL for a file
pub async fn get_file_url(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path((id, filename)): Path<(Uuid, String)>,
    Query(query): Query<FileUrlQuery>,
) -> Result<Json<FileUrlResponse>> {
    let conversation = load_conversation(&state, id).await?;
    ensure_owner(user_id.as_deref(), &conversation)?;

    let expires_in = query.expires_in.unwrap_or(DEFAULT_EXPIRES_IN);
    let url = conversation
        .get_file_url(&filename, expires_in)
        .await?
        .ok_or_else(|| Error::NotFound("File not found".to_string()))?;

    Ok(Json(FileUrlResponse {
        download_url: url,
        expires_in,
    }))
}

/// Delete a single file from a conversation.
///
/// Owner-only: anonymous callers are rejected. The blob delete is best
/// effort; the attachment records are removed regardless.
pub async fn delete_file(
    UserId(user_id): UserId,
    State(state): State<VaultState>,
    Path((id, filename)): Path<(Uuid, String)>,
) -> Result<Json<serde_json::Value>> {
    let Some(user_id) = user_id else {
        return Err(Error::Authentication(
            "Authentication required".to_string(),
        ));
    };

    let mut conversation = load_conversation(&state, id).await?;
    ensure_owner(Some(&user_id), &conversation)?;

    if !conversation.remove_file(&filename).await? {
        return Err(Error::NotFound("File not found".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "File deleted",
    })))
}
