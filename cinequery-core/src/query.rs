//! The user query type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One user question, immutable once created.
///
/// `turn_id` is the position of this query within its conversation and is
/// assigned by the caller (the chat engine takes it from the conversation
/// state so that ids keep increasing across window eviction).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Query {
    /// Unique identifier for this query.
    pub id: Uuid,
    /// The raw question text as the user typed it.
    pub text: String,
    /// Position of this query within its conversation.
    pub turn_id: u64,
    /// When the query was received.
    pub timestamp: DateTime<Utc>,
}

impl Query {
    /// Create a new query with a fresh id and the current timestamp.
    pub fn new(text: impl Into<String>, turn_id: u64) -> Self {
        Self { id: Uuid::new_v4(), text: text.into(), turn_id, timestamp: Utc::now() }
    }

    /// The query text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}
