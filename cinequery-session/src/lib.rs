//! # cinequery-session
//!
//! Conversation state for CineQuery sessions.
//!
//! [`ConversationState`] is a bounded, append-only window of
//! question/answer turns, consumed by the intent classifier and the
//! response composer for follow-up continuity. [`InMemorySessionStore`]
//! maps user/session ids to independent states so several conversations
//! can run side by side in one process.

pub mod state;
pub mod store;

pub use state::{ConversationState, DEFAULT_WINDOW, Turn};
pub use store::InMemorySessionStore;
