//! Nova Scribe - terminal chat client library
//!
//! This library provides the pieces of a chat client that keeps every
//! conversation as a resumable session: the session model and its durable
//! store, the controller that keeps route, transcript and storage in sync,
//! the remote chat endpoint client, and the terminal front end.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Chat turns, sessions and title derivation
//! - `storage`: Key-value backends (sled, in-memory) and the session store
//! - `controller`: Route parsing and the session synchronisation state machine
//! - `backend`: Chat endpoint abstraction and its HTTP implementation
//! - `app`: Driver tying the controller to a router and a backend
//! - `ui`: Input box, sidebar, progressive reveal and rendering
//! - `commands`: Handlers for the CLI subcommands
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```
//! use nova_scribe::controller::{Controller, Event};
//! use nova_scribe::storage::{MemoryStorage, SessionStore};
//!
//! let store = SessionStore::load(Box::new(MemoryStorage::new()));
//! let mut controller = Controller::new(store);
//! controller.handle(Event::Submit("Hello".to_string()));
//!
//! assert_eq!(controller.store().len(), 1);
//! assert_eq!(controller.store().sessions()[0].title, "Hello");
//! ```

pub mod app;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use app::ChatApp;
pub use backend::{ChatBackend, HttpChatBackend};
pub use config::Config;
pub use controller::{Controller, Event, Route};
pub use error::{NovaError, Result};
pub use session::{ChatRole, ChatSession, ChatTurn, SessionId};
pub use storage::SessionStore;

#[cfg(test)]
pub mod test_utils;
