//! Chat session data model
//!
//! A transcript is an ordered list of [`ChatTurn`]s. A [`ChatSession`] is a
//! named, dated, independently addressable transcript. The serialized form
//! matches what the session collection has always been stored as:
//!
//! ```json
//! {"id":1718000000000,"title":"Hello","date":"6/10/2024",
//!  "messages":[{"role":"user","content":"Hello"}]}
//! ```

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chat session: its creation time in milliseconds since the epoch
pub type SessionId = i64;

/// Maximum number of characters of the first message kept in a session title
pub const TITLE_MAX_CHARS: usize = 30;

/// Marker appended to titles that were truncated
pub const TITLE_ELLIPSIS: &str = "...";

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Text typed by the person using the client
    User,
    /// Text produced by the chat endpoint (or the fixed error reply)
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One message of a transcript
///
/// Turns are immutable once created; a transcript only ever grows by
/// appending new turns.
///
/// # Examples
///
/// ```
/// use nova_scribe::session::{ChatRole, ChatTurn};
///
/// let turn = ChatTurn::user("Hello");
/// assert_eq!(turn.role, ChatRole::User);
/// assert_eq!(turn.content, "Hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who wrote the turn
    pub role: ChatRole,
    /// Text of the turn
    pub content: String,
}

impl ChatTurn {
    /// Creates a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    /// Returns true if the turn was written by the user
    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// A persisted chat session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique id (creation timestamp in milliseconds)
    pub id: SessionId,
    /// Title derived from the first turn
    pub title: String,
    /// Creation date, formatted for display
    pub date: String,
    /// Transcript of the session
    pub messages: Vec<ChatTurn>,
}

impl ChatSession {
    /// Create a session from the transcript that started it
    ///
    /// The title is derived from the first turn and the date from
    /// `created_at`.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique session id
    /// * `created_at` - Creation time used for the display date
    /// * `messages` - Transcript at creation time
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use nova_scribe::session::{ChatSession, ChatTurn};
    ///
    /// let created = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
    /// let session = ChatSession::from_transcript(1, &created, vec![ChatTurn::user("Hello")]);
    /// assert_eq!(session.title, "Hello");
    /// assert_eq!(session.date, "6/3/2024");
    /// ```
    pub fn from_transcript<Tz>(
        id: SessionId,
        created_at: &DateTime<Tz>,
        messages: Vec<ChatTurn>,
    ) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let title = messages
            .first()
            .map(|turn| derive_title(&turn.content))
            .unwrap_or_default();

        Self {
            id,
            title,
            date: display_date(created_at),
            messages,
        }
    }

    /// Summary shown in the sidebar
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            title: self.title.clone(),
            date: self.date.clone(),
        }
    }
}

/// The part of a session the sidebar displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Session id
    pub id: SessionId,
    /// Session title
    pub title: String,
    /// Creation date
    pub date: String,
}

/// Derive a session title from the first message
///
/// Keeps the first 30 characters and appends `...` when the message is
/// longer. Characters are counted as Unicode scalar values so multi-byte
/// text is never split.
///
/// # Examples
///
/// ```
/// use nova_scribe::session::derive_title;
///
/// assert_eq!(derive_title("Hello"), "Hello");
/// assert_eq!(
///     derive_title("Summarise the quarterly invoices for me"),
///     "Summarise the quarterly invoic..."
/// );
/// ```
pub fn derive_title(first_message: &str) -> String {
    let mut chars = first_message.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}{}", head, TITLE_ELLIPSIS)
    } else {
        head
    }
}

/// Format a creation time as `M/D/YYYY`
pub fn display_date<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    at.format("%-m/%-d/%Y").to_string()
}
