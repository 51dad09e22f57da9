//! HTTP API for ChatVault
//!
//! A thin axum router over the [`chatvault_core::ChatVault`] facade:
//! conversation CRUD, message append, and file upload/URL endpoints. Caller
//! identity is an opaque `x-user-id` header; ownership checks mirror it, but
//! authentication policy belongs to the deployment, not this crate.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::routes;
pub use state::VaultState;
