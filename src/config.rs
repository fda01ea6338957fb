//! Configuration management for Nova Scribe
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Precedence, lowest to highest: built-in defaults, YAML file,
//! `NOVA_SCRIBE_*` environment variables, command-line flags.

use crate::error::{NovaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote chat endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Session storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// Terminal presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Remote chat endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// URL requests are posted to
    #[serde(default = "default_endpoint_url")]
    pub url: String,

    /// Request timeout in seconds; `None` waits indefinitely
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

fn default_endpoint_url() -> String {
    "http://localhost:8000/chat".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_endpoint_url(),
            timeout_seconds: None,
        }
    }
}

/// Session storage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Database directory; defaults to the user's data directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Terminal presentation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Delay between revealed characters of an assistant reply (ms, 0 = off)
    #[serde(default = "default_reveal_interval_ms")]
    pub reveal_interval_ms: u64,

    /// Name used in the welcome greeting
    #[serde(default)]
    pub user_name: Option<String>,

    /// Use colored output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_reveal_interval_ms() -> u64 {
    10
}

fn default_color() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            reveal_interval_ms: default_reveal_interval_ms(),
            user_name: None,
            color: default_color(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, whose overrides win over everything
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| NovaError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("NOVA_SCRIBE_ENDPOINT") {
            self.endpoint.url = url;
        }

        if let Ok(timeout) = std::env::var("NOVA_SCRIBE_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.endpoint.timeout_seconds = Some(value);
            } else {
                tracing::warn!("Invalid NOVA_SCRIBE_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(path) = std::env::var("NOVA_SCRIBE_STORAGE") {
            self.storage.path = Some(PathBuf::from(path));
        }

        if let Ok(reveal) = std::env::var("NOVA_SCRIBE_REVEAL_MS") {
            if let Ok(value) = reveal.parse() {
                self.ui.reveal_interval_ms = value;
            } else {
                tracing::warn!("Invalid NOVA_SCRIBE_REVEAL_MS: {}", reveal);
            }
        }

        if let Ok(name) = std::env::var("NOVA_SCRIBE_USER_NAME") {
            self.ui.user_name = Some(name);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.endpoint {
            self.endpoint.url = url.clone();
        }

        if let Some(path) = &cli.storage_path {
            self.storage.path = Some(PathBuf::from(path));
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `NovaError::Config` if the endpoint is not an http(s) URL or
    /// the timeout is zero
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.endpoint.url).map_err(|e| {
            NovaError::Config(format!("Invalid endpoint URL {}: {}", self.endpoint.url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(NovaError::Config(format!(
                "Endpoint URL must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.endpoint.timeout_seconds == Some(0) {
            return Err(NovaError::Config(
                "Endpoint timeout must be greater than zero".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
