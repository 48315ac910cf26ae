//! Process configuration.

use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Top-level application configuration, loaded from a JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Base URL of the course-catalog API
    pub endpoint: String,
    /// OAuth2 token endpoint; requests go out unauthenticated when unset
    #[serde(default)]
    pub token_endpoint: Option<String>,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl AppConfig {
    /// Loads configuration from `path`, then applies credential overrides
    /// from `COURSEPICK_CLIENT_ID` / `COURSEPICK_CLIENT_SECRET` so secrets
    /// can stay out of the file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let mut config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;

        if let Ok(client_id) = env::var("COURSEPICK_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Ok(client_secret) = env::var("COURSEPICK_CLIENT_SECRET") {
            config.client_secret = client_secret;
        }

        Ok(config)
    }
}
