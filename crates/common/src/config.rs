//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Messages backend selector ("memory")
    pub messages_backend: String,

    /// Files backend selector ("local")
    pub files_backend: String,

    /// Root directory for the local files backend
    pub uploads_path: String,

    /// Runtime configuration
    pub log_level: String,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            messages_backend: env::var("MESSAGES_BACKEND")
                .unwrap_or_else(|_| "memory".to_string()),
            files_backend: env::var("FILES_BACKEND").unwrap_or_else(|_| "local".to_string()),
            uploads_path: env::var("UPLOADS_PATH").unwrap_or_else(|_| "./uploads".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "chatvault=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}
