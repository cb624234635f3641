//! Configuration management for db-relay.
//!
//! Handles loading configuration from a TOML file, with command-line flags
//! and environment variables layered on top by the binary.

use crate::error::{RelayError, Result};
use crate::query::{ExecutionLimits, SearchTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure for db-relay.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Chat bot settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Target of the `/search` command.
    #[serde(default)]
    pub search: SearchTemplate,

    /// Database call limits.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Liveness endpoint settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Chat bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API token. Prefer the TOKEN environment variable over storing it here.
    pub token: Option<String>,

    /// Long-poll timeout for fetching updates.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Bot API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_poll_timeout() -> u64 {
    60
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: None,
            poll_timeout_secs: default_poll_timeout(),
            api_url: default_api_url(),
        }
    }
}

/// Database call limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Bound on opening a connection and the liveness probe.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Bound on a single query.
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_query_timeout() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Converts to executor limits.
    pub fn limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            query_timeout: Duration::from_secs(self.query_timeout_secs),
        }
    }
}

/// Liveness endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port the liveness endpoint binds to.
    #[serde(default = "default_http_port")]
    pub port: u16,
}

fn default_http_port() -> u16 {
    8080
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("db-relay")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RelayError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            RelayError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Applies command-line/environment values, which take precedence.
    pub fn apply_overrides(&mut self, token: Option<String>, port: Option<u16>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.bot.token = Some(token);
        }
        if let Some(port) = port {
            self.http.port = port;
        }
    }

    /// Returns the bot token or a configuration error when it is missing.
    pub fn require_token(&self) -> Result<&str> {
        self.bot
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                RelayError::config("Bot token is not set. Provide --token or the TOKEN variable.")
            })
    }
}
