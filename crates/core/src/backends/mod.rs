//! Pluggable storage backends for ChatVault
//!
//! Two flat capability contracts: [`MessagesBackend`] persists whole
//! conversation aggregates, [`FilesBackend`] stores raw attachment bytes.
//! Any concrete store (in-memory, filesystem, object storage, wide-column)
//! implements these independently.

pub mod local;
pub mod memory;

pub use local::LocalFiles;
pub use memory::MemoryMessages;

use chatvault_common::{Error, Result};
use uuid::Uuid;

use crate::domain::entities::Conversation;

/// Persistence contract for conversation aggregates.
///
/// Absence is signalled with `Option`/`bool`, never an error; transport
/// failures propagate as errors. No optimistic-concurrency check is made:
/// `save` is a last-writer-wins upsert.
#[async_trait::async_trait]
pub trait MessagesBackend: Send + Sync {
    /// Idempotent upsert keyed by conversation id
    async fn save(&self, conversation: &Conversation) -> Result<()>;

    /// Load the full aggregate, or `None` if not found. Never partially
    /// hydrates.
    async fn get(&self, conversation_id: Uuid) -> Result<Option<Conversation>>;

    /// All conversations owned by a user, ordered by `last_active`
    /// descending
    async fn get_by_user(&self, user_id: &str) -> Result<Vec<Conversation>>;

    /// Remove the aggregate; returns whether a record existed
    async fn delete(&self, conversation_id: Uuid) -> Result<bool>;

    /// Paginate over all conversations regardless of owner, descending by
    /// `last_active`. Backends may decline to support this.
    async fn list(&self, _limit: usize, _offset: usize) -> Result<Vec<Conversation>> {
        Err(Error::Unsupported(
            "list is not implemented for this backend".to_string(),
        ))
    }
}

/// Binary blob storage contract for file attachments.
#[async_trait::async_trait]
pub trait FilesBackend: Send + Sync {
    /// Store content at `key`, overwriting if present
    async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Fetch content, or `None` if absent
    async fn download(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Remove the blob; returns whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Existence check without fetching content
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Time-bounded retrieval URL, or `None` when the backend does not
    /// issue URLs. Weaker backends may return an unauthenticated direct
    /// reference instead of a true signed URL; callers must treat the
    /// result accordingly.
    async fn get_signed_url(
        &self,
        _key: &str,
        _expires_in: u64,
        _download_filename: Option<&str>,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}
