//! Command-line interface definition for Nova Scribe
//!
//! This module defines the CLI structure using clap's derive API,
//! providing the interactive chat and session management commands.

use clap::{Parser, Subcommand};

/// Nova Scribe - terminal chat client
///
/// Chat with a remote assistant and keep every conversation as a
/// resumable session.
#[derive(Parser, Debug, Clone)]
#[command(name = "nova-scribe")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/nova-scribe.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the chat endpoint URL
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Override the session database location
    #[arg(long, global = true)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive chat
    Chat {
        /// Open this session instead of the first stored one
        #[arg(short, long)]
        session: Option<String>,
    },

    /// Manage stored chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionsCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionsCommand {
    /// List stored sessions
    List,

    /// Print the transcript of a session
    Show {
        /// Session id
        id: i64,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/nova-scribe.yaml".to_string()),
            verbose: false,
            endpoint: None,
            storage_path: None,
            command: Commands::Chat { session: None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/nova-scribe.yaml".to_string()));
        assert!(!cli.verbose);
        assert_eq!(cli.command, Commands::Chat { session: None });
    }

    #[test]
    fn test_cli_parse_chat_command() {
        let cli = Cli::try_parse_from(["nova-scribe", "chat"]).unwrap();
        assert_eq!(cli.command, Commands::Chat { session: None });
    }

    #[test]
    fn test_cli_parse_chat_with_session() {
        let cli = Cli::try_parse_from(["nova-scribe", "chat", "--session", "1718000000000"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Chat {
                session: Some("1718000000000".to_string())
            }
        );
    }

    #[test]
    fn test_cli_parse_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "nova-scribe",
            "chat",
            "--endpoint",
            "http://example.test/chat",
            "--storage-path",
            "/tmp/s.db",
        ])
        .unwrap();
        assert_eq!(cli.endpoint.as_deref(), Some("http://example.test/chat"));
        assert_eq!(cli.storage_path.as_deref(), Some("/tmp/s.db"));
    }

    #[test]
    fn test_cli_parse_sessions_list() {
        let cli = Cli::try_parse_from(["nova-scribe", "sessions", "list"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Sessions {
                command: SessionsCommand::List
            }
        );
    }

    #[test]
    fn test_cli_parse_sessions_delete() {
        let cli = Cli::try_parse_from(["nova-scribe", "sessions", "delete", "42"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Sessions {
                command: SessionsCommand::Delete { id: 42 }
            }
        );
    }

    #[test]
    fn test_cli_rejects_non_numeric_session_id() {
        assert!(Cli::try_parse_from(["nova-scribe", "sessions", "show", "abc"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["nova-scribe"]).is_err());
    }
}
