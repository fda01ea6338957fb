//! Special commands parser for interactive chat
//!
//! Lines starting with `/` (plus the bare words `exit` and `quit`) are
//! commands that act on the session list or the view instead of being sent
//! to the chat endpoint. Commands are case-insensitive.

use crate::ui::SessionRef;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command argument is not a row number or session id
    #[error("Invalid argument for {command}: {arg}\n\nExpected a row number or a session id")]
    InvalidArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Start a new chat
    NewChat,

    /// Dismiss the welcome screen without sending anything
    Start,

    /// Print the session list
    ListSessions,

    /// Open a session by row number or id
    Open(SessionRef),

    /// Delete a session by row number or id
    Delete(SessionRef),

    /// Print phase, route and counts
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent as a chat message.
    None,
}

/// Parse a user input string into a special command
///
/// # Arguments
///
/// * `input` - The user input string to parse
///
/// # Returns
///
/// Returns Ok(SpecialCommand) for valid commands or SpecialCommand::None for
/// regular chat input.
///
/// # Errors
///
/// Returns CommandError::UnknownCommand if input starts with "/" but is not a valid command.
/// Returns CommandError::MissingArgument if `/open` or `/delete` has no argument.
/// Returns CommandError::InvalidArgument if the argument is not a row number or id.
///
/// # Examples
///
/// ```
/// use nova_scribe::commands::special_commands::{parse_special_command, SpecialCommand};
/// use nova_scribe::ui::SessionRef;
///
/// let cmd = parse_special_command("/open 2").unwrap();
/// assert_eq!(cmd, SpecialCommand::Open(SessionRef::Row(2)));
///
/// let cmd = parse_special_command("hello there").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match command {
        "/new" => Ok(SpecialCommand::NewChat),
        "/start" => Ok(SpecialCommand::Start),
        "/sessions" | "/ls" => Ok(SpecialCommand::ListSessions),
        "/open" => session_ref("/open", "/open <row|id>", arg).map(SpecialCommand::Open),
        "/delete" | "/rm" => {
            session_ref(command, "/delete <row|id>", arg).map(SpecialCommand::Delete)
        }
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

fn session_ref(command: &str, usage: &str, arg: &str) -> Result<SessionRef, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingArgument {
            command: command.to_string(),
            usage: usage.to_string(),
        });
    }
    SessionRef::parse(arg).ok_or_else(|| CommandError::InvalidArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    })
}

/// Display help information for special commands
///
/// # Examples
///
/// ```
/// use nova_scribe::commands::special_commands::print_help;
///
/// print_help();
/// ```
pub fn print_help() {
    println!(
        r#"
Special Commands
================

SESSIONS:
  /new              - Start a new chat
  /start            - Leave the welcome screen without sending anything
  /sessions         - List saved sessions
  /ls               - Same as /sessions
  /open <row|id>    - Open a session by row number or id
  /delete <row|id>  - Delete a session by row number or id
  /rm <row|id>      - Same as /delete

INFORMATION:
  /status           - Show phase, route and counts
  /help             - Show this help message
  /?                - Same as /help

SESSION CONTROL:
  exit              - Exit interactive mode
  quit              - Same as exit
  Ctrl-C            - Skip the reply animation, or exit at the prompt

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Row numbers refer to the order shown by /sessions
"#
    );
}
