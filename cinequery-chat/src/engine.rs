//! The per-turn entry point a chat UI drives.

use std::fmt::Write as _;

use tracing::info;

use cinequery_core::{Answer, Query, Result};
use cinequery_router::Orchestrator;
use cinequery_session::{ConversationState, Turn};

use crate::composer::Composer;

/// Phrases that ask for the conversation so far instead of the catalog.
const RECALL_PHRASES: &[&str] =
    &["what did i ask", "what did we talk about", "previous conversation"];

/// How many turns a recall request lists.
const RECALL_TURNS: usize = 3;

/// Runs one full turn: route, compose, remember.
///
/// The conversation state is mutated only after the composer returns, by
/// the same task that produced the answer; recall requests are answered
/// straight from the state and are not recorded as turns.
pub struct ChatEngine {
    orchestrator: Orchestrator,
    composer: Composer,
}

impl ChatEngine {
    /// Create an engine from its two stages.
    pub fn new(orchestrator: Orchestrator, composer: Composer) -> Self {
        Self { orchestrator, composer }
    }

    /// Handle one user turn against the given conversation state.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::InvalidQuery`](cinequery_core::CineError::InvalidQuery)
    /// for empty input; every other failure mode degrades into the answer
    /// itself.
    pub async fn run_turn(&self, state: &mut ConversationState, text: &str) -> Result<Answer> {
        let query = Query::new(text, state.next_turn_id());

        if is_recall_request(text) {
            info!(query_id = %query.id, "answering recall request from state");
            return Ok(recall_answer(state));
        }

        let merged = self.orchestrator.handle(&query, state).await?;
        let answer = self.composer.compose(&query, &merged, state).await;

        state.append(Turn { query, answer: answer.text.clone() });
        Ok(answer)
    }
}

fn is_recall_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    RECALL_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

fn recall_answer(state: &ConversationState) -> Answer {
    if state.is_empty() {
        return Answer {
            text: "We haven't talked about anything yet.".to_string(),
            sources: Default::default(),
            degraded: false,
        };
    }

    let mut text = String::from("Here's our recent conversation:\n");
    for turn in state.recent(RECALL_TURNS) {
        let _ = writeln!(text, "You asked: {}", turn.query.text);
        let _ = writeln!(text, "I answered: {}", turn.answer);
    }
    Answer { text, sources: Default::default(), degraded: false }
}
