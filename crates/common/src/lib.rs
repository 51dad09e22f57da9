//! Shared utilities, configuration, and error handling for ChatVault
//!
//! This crate provides common functionality used across the ChatVault workspace:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Custom axum extractors

pub mod config;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use error::{Error, Result};
pub use extractors::{Pagination, UserId, ValidatedJson};
