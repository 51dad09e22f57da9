//! Domain entities for ChatVault
//!
//! A conversation aggregates an ordered message history and a list of file
//! attachment records under one identity. Messages and attachments are
//! immutable once appended; all mutation goes through `Conversation`, which
//! persists itself through its owning vault.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chatvault_common::{Error, Result};

use crate::vault::ChatVault;

/// Open string-keyed metadata map carried by conversations, messages and
/// attachments. Serialized as a plain JSON object.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Maximum auto-generated title length, in characters
const AUTO_TITLE_MAX_CHARS: usize = 50;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(Error::Validation(format!("Unknown message role: {other}"))),
        }
    }
}

/// A single message in a conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Message {
    pub(crate) fn new(role: MessageRole, content: String, metadata: Metadata) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Metadata record for a file stored out-of-band in a files backend.
///
/// `storage_key` is an opaque backend locator derived from the conversation
/// identity and the filename; it is not user-visible. Filenames are NOT
/// guaranteed unique within a conversation: re-uploading a filename
/// overwrites the blob at the derived key but appends a fresh record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAttachment {
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl FileAttachment {
    pub(crate) fn new(
        filename: String,
        content_type: String,
        size: u64,
        storage_key: String,
        metadata: Metadata,
    ) -> Self {
        Self {
            filename,
            content_type,
            size,
            storage_key,
            uploaded_at: Utc::now(),
            metadata,
        }
    }
}

/// One message in LLM-compatible history shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: MessageRole,
    pub content: String,
}

/// A conversation with messages and file attachments.
///
/// Typically created via [`ChatVault::create_conversation`] or loaded via
/// [`ChatVault::get_conversation`], which bind the vault back-reference. A
/// conversation constructed standalone is detached: any operation that needs
/// persistence or file I/O fails with [`Error::DetachedConversation`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    conversation_id: Uuid,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    title: String,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    files: Vec<FileAttachment>,
    #[serde(default)]
    metadata: Metadata,

    // Back-reference to the owning vault; set by the vault, never persisted.
    #[serde(skip)]
    vault: Option<ChatVault>,

    // Tracks whether a title was set explicitly (rename), so auto-titling
    // never overwrites an explicitly-empty title within this object's
    // lifetime. Not part of the persisted shape.
    #[serde(skip)]
    title_set: bool,
}

impl Conversation {
    /// Create a new detached conversation with a generated ID
    pub fn new(user_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            conversation_id: Uuid::new_v4(),
            user_id,
            title: String::new(),
            created_at: now,
            last_active: now,
            messages: Vec::new(),
            files: Vec::new(),
            metadata: Metadata::new(),
            vault: None,
            title_set: false,
        }
    }

    pub(crate) fn with_vault(
        user_id: Option<String>,
        metadata: Metadata,
        vault: ChatVault,
    ) -> Self {
        let mut conversation = Self::new(user_id);
        conversation.metadata = metadata;
        conversation.vault = Some(vault);
        conversation
    }

    /// Bind (or rebind) the owning vault after hydration
    pub(crate) fn bind(&mut self, vault: ChatVault) {
        self.vault = Some(vault);
    }

    /// Whether this conversation is bound to a vault
    pub fn is_bound(&self) -> bool {
        self.vault.is_some()
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Append a message, update activity, auto-title, and persist.
    ///
    /// By the time this returns the messages backend has accepted the save.
    pub async fn add_message(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Result<Message> {
        self.add_message_with(role, content, Metadata::new()).await
    }

    /// Like [`Self::add_message`], with an explicit metadata map
    pub async fn add_message_with(
        &mut self,
        role: MessageRole,
        content: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Message> {
        self.vault()?;

        let message = Message::new(role, content.into(), metadata);
        self.messages.push(message.clone());
        self.last_active = Utc::now();
        self.auto_title();
        self.save().await?;
        Ok(message)
    }

    /// All messages, in append order
    pub fn get_messages(&self) -> &[Message] {
        &self.messages
    }

    /// Message history in LLM-compatible role/content shape
    pub fn get_history(&self) -> Vec<HistoryMessage> {
        self.messages
            .iter()
            .map(|m| HistoryMessage {
                role: m.role,
                content: m.content.clone(),
            })
            .collect()
    }

    /// Backend storage key for a filename within this conversation.
    ///
    /// `{user_id}/{conversation_id}/{filename}` when a user is present,
    /// `{conversation_id}/{filename}` otherwise. Deterministic, so
    /// re-uploading the same filename overwrites the prior blob.
    pub fn storage_key(&self, filename: &str) -> String {
        match &self.user_id {
            Some(user_id) => format!("{}/{}/{}", user_id, self.conversation_id, filename),
            None => format!("{}/{}", self.conversation_id, filename),
        }
    }

    /// Upload a file and append its attachment record
    pub async fn attach_file(
        &mut self,
        filename: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<FileAttachment> {
        self.attach_file_with(filename, content, content_type, Metadata::new())
            .await
    }

    /// Like [`Self::attach_file`], with an explicit metadata map
    pub async fn attach_file_with(
        &mut self,
        filename: &str,
        content: &[u8],
        content_type: &str,
        metadata: Metadata,
    ) -> Result<FileAttachment> {
        let storage_key = self.storage_key(filename);
        self.vault()?
            .files()
            .upload(&storage_key, content, content_type)
            .await?;

        let attachment = FileAttachment::new(
            filename.to_string(),
            content_type.to_string(),
            content.len() as u64,
            storage_key,
            metadata,
        );
        self.files.push(attachment.clone());
        self.save().await?;
        Ok(attachment)
    }

    /// All attachment records, in upload order
    pub fn get_files(&self) -> &[FileAttachment] {
        &self.files
    }

    /// Retrieval URL for a file, by filename (first match).
    ///
    /// Returns `None` when no attachment matches or the files backend does
    /// not issue URLs. Local backends may return an unauthenticated direct
    /// path rather than a true signed URL.
    pub async fn get_file_url(&self, filename: &str, expires_in: u64) -> Result<Option<String>> {
        let files = self.vault()?.files();
        match self.files.iter().find(|f| f.filename == filename) {
            Some(attachment) => {
                files
                    .get_signed_url(&attachment.storage_key, expires_in, Some(filename))
                    .await
            }
            None => Ok(None),
        }
    }

    /// Download file content directly, by filename (first match)
    pub async fn get_file_content(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        let files = self.vault()?.files();
        match self.files.iter().find(|f| f.filename == filename) {
            Some(attachment) => files.download(&attachment.storage_key).await,
            None => Ok(None),
        }
    }

    /// Remove a file by filename: delete its blob (best effort) and drop
    /// every attachment record with that filename.
    ///
    /// Returns `false` when no attachment matches. Blob-deletion failures
    /// are logged and swallowed; the metadata records are pruned regardless.
    pub async fn remove_file(&mut self, filename: &str) -> Result<bool> {
        let vault = self.vault()?.clone();
        let Some(attachment) = self.files.iter().find(|f| f.filename == filename) else {
            return Ok(false);
        };

        if let Err(error) = vault.files().delete(&attachment.storage_key).await {
            tracing::warn!(
                storage_key = %attachment.storage_key,
                %error,
                "Failed to delete file blob; dropping attachment record anyway"
            );
        }

        self.files.retain(|f| f.filename != filename);
        self.save().await?;
        Ok(true)
    }

    /// Unconditionally overwrite the title and persist.
    ///
    /// A renamed conversation is never auto-titled again, even when renamed
    /// to the empty string.
    pub async fn rename(&mut self, title: impl Into<String>) -> Result<()> {
        self.vault()?;
        self.title = title.into();
        self.title_set = true;
        self.save().await
    }

    /// Persist the current state through the owning vault
    pub async fn save(&self) -> Result<()> {
        self.vault()?.messages().save(self).await
    }

    fn vault(&self) -> Result<&ChatVault> {
        self.vault.as_ref().ok_or_else(|| {
            Error::DetachedConversation(format!(
                "conversation {} has no bound vault",
                self.conversation_id
            ))
        })
    }

    /// Derive a title from the first user message, unless one is already set
    fn auto_title(&mut self) {
        if self.title_set || !self.title.is_empty() {
            return;
        }
        if let Some(message) = self.messages.iter().find(|m| m.role == MessageRole::User) {
            let mut title: String = message.content.chars().take(AUTO_TITLE_MAX_CHARS).collect();
            if message.content.chars().count() > AUTO_TITLE_MAX_CHARS {
                title.push_str("...");
            }
            self.title = title;
        }
    }
}
