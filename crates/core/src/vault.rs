//! The ChatVault facade
//!
//! Composition root for one messages backend and one files backend. The
//! vault is the only component that sees both backends; conversations reach
//! storage solely through the vault reference it injects into them.

use std::sync::Arc;

use uuid::Uuid;

use chatvault_common::Result;

use crate::backends::{FilesBackend, MessagesBackend};
use crate::domain::entities::{Conversation, Metadata};

/// Main ChatVault facade for managing AI conversations.
///
/// Cheap to clone: two shared backend handles and no other state.
#[derive(Clone)]
pub struct ChatVault {
    messages: Arc<dyn MessagesBackend>,
    files: Arc<dyn FilesBackend>,
}

impl std::fmt::Debug for ChatVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatVault").finish_non_exhaustive()
    }
}

impl ChatVault {
    pub fn new(messages: Arc<dyn MessagesBackend>, files: Arc<dyn FilesBackend>) -> Self {
        Self { messages, files }
    }

    pub(crate) fn messages(&self) -> &dyn MessagesBackend {
        self.messages.as_ref()
    }

    pub(crate) fn files(&self) -> &dyn FilesBackend {
        self.files.as_ref()
    }

    /// Create a new conversation, persisted before this returns.
    pub async fn create_conversation(
        &self,
        user_id: Option<&str>,
        metadata: Metadata,
    ) -> Result<Conversation> {
        let conversation =
            Conversation::with_vault(user_id.map(str::to_string), metadata, self.clone());
        self.messages.save(&conversation).await?;
        Ok(conversation)
    }

    /// Load an existing conversation by ID, rebinding it to this vault.
    pub async fn get_conversation(&self, conversation_id: Uuid) -> Result<Option<Conversation>> {
        let conversation = self.messages.get(conversation_id).await?;
        Ok(conversation.map(|mut c| {
            c.bind(self.clone());
            c
        }))
    }

    /// All conversations for a user, most recently active first.
    pub async fn get_user_conversations(&self, user_id: &str) -> Result<Vec<Conversation>> {
        let mut conversations = self.messages.get_by_user(user_id).await?;
        for conversation in &mut conversations {
            conversation.bind(self.clone());
        }
        Ok(conversations)
    }

    /// Paginate over all conversations regardless of owner.
    ///
    /// Fails with `Error::Unsupported` when the messages backend declines.
    pub async fn list_conversations(&self, limit: usize, offset: usize) -> Result<Vec<Conversation>> {
        let mut conversations = self.messages.list(limit, offset).await?;
        for conversation in &mut conversations {
            conversation.bind(self.clone());
        }
        Ok(conversations)
    }

    /// Delete a conversation and its attached files.
    ///
    /// Returns `false` without touching file storage when the metadata
    /// record does not exist. Blob deletions are best effort: a failed
    /// delete is logged and the remaining attachments and the metadata
    /// record are removed regardless.
    pub async fn delete_conversation(&self, conversation_id: Uuid) -> Result<bool> {
        let Some(conversation) = self.get_conversation(conversation_id).await? else {
            return Ok(false);
        };

        for attachment in conversation.get_files() {
            if let Err(error) = self.files.delete(&attachment.storage_key).await {
                tracing::warn!(
                    %conversation_id,
                    storage_key = %attachment.storage_key,
                    %error,
                    "Failed to delete attachment blob; continuing with deletion"
                );
            }
        }

        self.messages.delete(conversation_id).await
    }

    /// Mark a conversation as archived.
    ///
    /// Advisory metadata only: an archived conversation reads and writes
    /// exactly like an active one.
    pub async fn archive_conversation(&self, conversation_id: Uuid) -> Result<bool> {
        let Some(mut conversation) = self.get_conversation(conversation_id).await? else {
            return Ok(false);
        };

        conversation
            .metadata_mut()
            .insert("archived".to_string(), serde_json::Value::Bool(true));
        self.messages.save(&conversation).await?;
        Ok(true)
    }
}
