//! API state for the ChatVault routes

use chatvault_core::ChatVault;

/// Application state shared by every handler
#[derive(Clone)]
pub struct VaultState {
    pub vault: ChatVault,
}

impl VaultState {
    pub fn new(vault: ChatVault) -> Self {
        Self { vault }
    }
}
