//! Error types for Nova Scribe
//!
//! This module defines the error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Nova Scribe operations
///
/// Covers configuration loading, chat backend calls, session storage and
/// the interactive terminal. Failures of the chat backend never reach the
/// user as errors; the controller turns them into an assistant turn.
#[derive(Error, Debug)]
pub enum NovaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chat backend errors (transport failure, non-success status, bad body)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Session storage errors (database operations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Result type alias for Nova Scribe operations
///
/// Uses `anyhow::Error` so callers can attach context while still being
/// able to downcast to [`NovaError`].
pub type Result<T> = anyhow::Result<T>;
