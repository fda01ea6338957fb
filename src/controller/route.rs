//! Navigation routes
//!
//! The active session is addressed as `/chat/{id}`; everything else is the
//! home route. The id segment is kept verbatim so that a route naming a
//! session that does not parse as an id can still be told apart from home.

use crate::session::SessionId;
use std::fmt;

/// A navigable location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: no session named
    Home,
    /// `/chat/{id}` with the raw id segment
    Chat(String),
}

impl Route {
    /// Route of an existing session
    pub fn session(id: SessionId) -> Self {
        Self::Chat(id.to_string())
    }

    /// Session id named by the route, if it parses
    pub fn session_id(&self) -> Option<SessionId> {
        match self {
            Self::Home => None,
            Self::Chat(raw) => raw.parse().ok(),
        }
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::Home
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => write!(f, "/"),
            Self::Chat(id) => write!(f, "/chat/{}", id),
        }
    }
}
