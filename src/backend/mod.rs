//! Chat backend abstraction
//!
//! The client talks to a single remote chat endpoint that takes the latest
//! user text plus the prior transcript and answers with one reply string.
//! [`ChatBackend`] is the seam the app driver calls through; the HTTP
//! implementation lives in [`http`].

use crate::error::Result;
use crate::session::ChatTurn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::HttpChatBackend;

/// Request body sent to the chat endpoint
///
/// # Examples
///
/// ```
/// use nova_scribe::backend::ChatRequest;
/// use nova_scribe::session::ChatTurn;
///
/// let request = ChatRequest::new("How are you?", vec![ChatTurn::user("Hi")]);
/// let json = serde_json::to_string(&request).unwrap();
/// assert_eq!(
///     json,
///     r#"{"prompt":"How are you?","history":[{"role":"user","content":"Hi"}]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Latest user text
    pub prompt: String,
    /// Transcript so far, ending with the latest user turn
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

impl ChatRequest {
    /// Create a request
    pub fn new(prompt: impl Into<String>, history: Vec<ChatTurn>) -> Self {
        Self {
            prompt: prompt.into(),
            history,
        }
    }
}

/// Response body returned by the chat endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant reply text
    pub response: String,
}

/// A remote chat endpoint
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one request and wait for the reply text
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or a
    /// body that is not a [`ChatReply`]. Callers treat all of these alike.
    async fn reply(&self, request: &ChatRequest) -> Result<String>;
}
