//! Terminal rendering of the chat view
//!
//! Everything here writes to a caller-supplied writer so the REPL can use
//! stdout and tests can use a buffer.

use super::reveal::{MessageKey, Typewriter};
use crate::controller::{Phase, Route};
use crate::session::{ChatRole, ChatTurn, SessionId};
use colored::{ColoredString, Colorize};
use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Shown under the greeting on the welcome screen
pub const WELCOME_PROMPT: &str = "Type your prompt and press Enter to start chatting.";

/// Shown for a started chat with no messages yet
pub const START_HINT: &str = "Say hello to start the conversation.";

/// Greeting line for the welcome screen
///
/// # Examples
///
/// ```
/// use nova_scribe::ui::greeting;
///
/// assert_eq!(greeting(Some("Ada")), "Hi, Ada 👋");
/// assert_eq!(greeting(None), "Hi there 👋");
/// ```
pub fn greeting(user_name: Option<&str>) -> String {
    match user_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi, {} 👋", name),
        None => "Hi there 👋".to_string(),
    }
}

/// Speaker label for a turn
pub fn role_label(role: ChatRole) -> ColoredString {
    match role {
        ChatRole::User => "You".green().bold(),
        ChatRole::Assistant => "Assistant".cyan().bold(),
    }
}

/// One-line summary of the controller state for `/status`
pub fn status_line(phase: Phase, route: &Route, sessions: usize, turns: usize) -> String {
    let phase = match phase {
        Phase::Empty => "empty".to_string(),
        Phase::Loading(id) => format!("loading ({})", id),
        Phase::Active(id) => format!("active ({})", id),
    };
    format!(
        "Phase: {}  Route: {}  Sessions: {}  Messages: {}",
        phase, route, sessions, turns
    )
}

/// Renders transcripts and new turns
#[derive(Debug, Clone)]
pub struct ChatView {
    typewriter: Typewriter,
    user_name: Option<String>,
}

impl ChatView {
    /// Create a view revealing assistant turns at `reveal_interval`
    pub fn new(reveal_interval: Duration, user_name: Option<String>) -> Self {
        Self {
            typewriter: Typewriter::new(reveal_interval),
            user_name,
        }
    }

    /// Print the welcome screen
    pub fn welcome<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", greeting(self.user_name.as_deref()).bold())?;
        writeln!(out, "{}", WELCOME_PROMPT.dimmed())?;
        writeln!(out, "{}", "Type '/help' for commands, 'exit' to quit.".dimmed())?;
        writeln!(out)
    }

    /// Print a whole transcript without animation
    ///
    /// Used when a session is opened; an empty but started chat shows the
    /// start hint instead.
    pub fn transcript<W: Write>(
        &mut self,
        session: Option<SessionId>,
        turns: &[ChatTurn],
        out: &mut W,
    ) -> io::Result<()> {
        self.typewriter.reset();
        if let Some(id) = session {
            writeln!(out, "{}", format!("-- session {} --", id).dimmed())?;
        }
        if turns.is_empty() {
            writeln!(out, "{}", START_HINT.dimmed())?;
            return writeln!(out);
        }
        for turn in turns {
            writeln!(out, "{}: {}", role_label(turn.role), turn.content)?;
        }
        writeln!(out)
    }

    /// Print one freshly added turn
    ///
    /// User turns are printed at once; assistant turns are revealed
    /// progressively unless `cancel` fires.
    pub async fn turn<W: Write>(
        &mut self,
        key: MessageKey,
        turn: &ChatTurn,
        out: &mut W,
        cancel: &CancellationToken,
    ) -> io::Result<()> {
        write!(out, "{}: ", role_label(turn.role))?;
        match turn.role {
            ChatRole::User => write!(out, "{}", turn.content)?,
            ChatRole::Assistant => {
                self.typewriter
                    .play(key, &turn.content, out, cancel)
                    .await?
            }
        }
        writeln!(out)?;
        writeln!(out)
    }

    /// Print the waiting indicator
    pub fn thinking<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", "thinking...".dimmed().italic())?;
        out.flush()
    }
}
