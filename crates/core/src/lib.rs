//! ChatVault core: conversation model, backend traits and the vault facade
//!
//! A `ChatVault` binds one [`MessagesBackend`] (conversation aggregates) and
//! one [`FilesBackend`] (binary attachments) and hands out [`Conversation`]
//! handles that persist themselves through the vault on every mutation.
//!
//! ```no_run
//! use std::sync::Arc;
//! use chatvault_core::{ChatVault, MemoryMessages, LocalFiles, MessageRole};
//!
//! # async fn demo() -> chatvault_common::Result<()> {
//! let vault = ChatVault::new(
//!     Arc::new(MemoryMessages::new()),
//!     Arc::new(LocalFiles::new("./uploads")),
//! );
//!
//! let mut conversation = vault.create_conversation(Some("user-123"), Default::default()).await?;
//! conversation.add_message(MessageRole::User, "Hello!").await?;
//! # Ok(())
//! # }
//! ```

pub mod backends;
pub mod domain;
pub mod vault;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{
    Conversation, FileAttachment, HistoryMessage, Message, MessageRole, Metadata,
};

// Re-export backend traits and reference implementations
pub use backends::{FilesBackend, LocalFiles, MemoryMessages, MessagesBackend};

// Re-export the facade
pub use vault::ChatVault;
