//! Bounded per-session conversation history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use cinequery_core::Query;

/// Default number of retained turns.
pub const DEFAULT_WINDOW: usize = 5;

/// One completed exchange: the user's query and the final answer text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    /// The user's query.
    pub query: Query,
    /// The answer the composer produced for it.
    pub answer: String,
}

/// Ordered conversation history, bounded to a configurable window.
///
/// Append-only except for eviction of the oldest turn when the window is
/// exceeded. One writer per session; the chat engine appends only after the
/// composer has returned, on the same task that produced the answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    turns: VecDeque<Turn>,
    window: usize,
    turns_seen: u64,
}

impl ConversationState {
    /// Create an empty state retaining at most `window` turns.
    pub fn new(window: usize) -> Self {
        Self { turns: VecDeque::with_capacity(window), window, turns_seen: 0 }
    }

    /// Append a completed turn, evicting the oldest when the window is full.
    pub fn append(&mut self, turn: Turn) {
        if self.window == 0 {
            self.turns_seen += 1;
            return;
        }
        if self.turns.len() == self.window {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
        self.turns_seen += 1;
    }

    /// The last `n` turns in conversation order (oldest first).
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Turn> {
        let skip = self.turns.len().saturating_sub(n);
        self.turns.iter().skip(skip)
    }

    /// The turn id to assign to the next query.
    ///
    /// Counts every turn ever appended, so ids keep increasing after the
    /// window has started evicting.
    pub fn next_turn_id(&self) -> u64 {
        self.turns_seen
    }

    /// Number of retained turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether no turns are retained.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(text: &str, id: u64) -> Turn {
        Turn { query: Query::new(text, id), answer: format!("answer to {text}") }
    }

    #[test]
    fn evicts_oldest_when_window_exceeded() {
        let mut state = ConversationState::new(2);
        state.append(turn("one", 0));
        state.append(turn("two", 1));
        state.append(turn("three", 2));

        assert_eq!(state.len(), 2);
        let texts: Vec<&str> = state.recent(10).map(|t| t.query.text.as_str()).collect();
        assert_eq!(texts, vec!["two", "three"]);
    }

    #[test]
    fn recent_returns_last_n_in_order() {
        let mut state = ConversationState::new(5);
        for i in 0..4 {
            state.append(turn(&format!("q{i}"), i));
        }
        let texts: Vec<&str> = state.recent(2).map(|t| t.query.text.as_str()).collect();
        assert_eq!(texts, vec!["q2", "q3"]);
    }

    #[test]
    fn turn_ids_keep_increasing_across_eviction() {
        let mut state = ConversationState::new(1);
        assert_eq!(state.next_turn_id(), 0);
        state.append(turn("a", 0));
        state.append(turn("b", 1));
        state.append(turn("c", 2));
        assert_eq!(state.next_turn_id(), 3);
        assert_eq!(state.len(), 1);
    }
}
