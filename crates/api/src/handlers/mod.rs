//! API handlers for the ChatVault routes

pub mod conversations;
pub mod files;
pub mod messages;

use uuid::Uuid;

use chatvault_common::{Error, Result};
use chatvault_core::Conversation;

use crate::state::VaultState;

/// Load a conversation or fail with 404
pub(crate) async fn load_conversation(state: &VaultState, id: Uuid) -> Result<Conversation> {
    state
        .vault
        .get_conversation(id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))
}

/// Reject callers that present an identity different from the owner.
///
/// Anonymous callers and ownerless conversations pass: ownership policy
/// beyond this mirror check is the deployment's concern.
pub(crate) fn ensure_owner(user_id: Option<&str>, conversation: &Conversation) -> Result<()> {
    if let (Some(caller), Some(owner)) = (user_id, conversation.user_id()) {
        if caller != owner {
            return Err(Error::Authorization("Access denied".to_string()));
        }
    }
    Ok(())
}
