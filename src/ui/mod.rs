//! Terminal front end pieces
//!
//! - `reveal`: progressive character reveal for assistant replies
//! - `input`: the single-line input box
//! - `sidebar`: session list and the intents it emits
//! - `render`: welcome screen, transcripts and status output

pub mod input;
pub mod render;
pub mod reveal;
pub mod sidebar;

pub use input::InputBox;
pub use render::{greeting, role_label, status_line, ChatView, START_HINT, WELCOME_PROMPT};
pub use reveal::{reveal, MessageKey, Reveal, Typewriter};
pub use sidebar::{SessionRef, Sidebar, SidebarIntent};
