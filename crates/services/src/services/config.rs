use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Process configuration, read once at startup. Every field has a development
/// default so a bare `cargo run` works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Seeds the first admin profile; authorization afterwards reads the
    /// persisted `is_admin` flag.
    pub admin_email: String,
    pub asset_root: PathBuf,
    pub public_base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:portfolio.db".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3001".to_string()),
            admin_email: env::var("ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@example.com".to_string()),
            asset_root: env::var("ASSET_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("assets")),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "/assets".to_string()),
        }
    }
}
