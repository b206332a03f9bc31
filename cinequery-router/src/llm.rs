//! Model-delegating classifier with a route-both fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use cinequery_core::{
    ClassificationResult, GenerateRequest, Query, Route, TextGenerator,
};
use cinequery_session::ConversationState;

use crate::classify::Classifier;

/// Confidence assigned to a route the model stated unambiguously.
const MODEL_CONFIDENCE: f32 = 0.9;

/// How many prior turns to include in the routing prompt.
const DEFAULT_HISTORY_TURNS: usize = 3;

/// A [`Classifier`] that delegates the routing decision to a language model.
///
/// The prompt describes the two stores and asks for exactly one of
/// `STRUCTURED`, `SEMANTIC`, or `BOTH`. Recent turns are included so
/// follow-up questions stay on the established route. A generator error or
/// an unparseable reply degrades to routing both ways with confidence
/// zero — the classifier never blocks or errors the pipeline. (The
/// orchestrator additionally bounds the whole call with its classify
/// timeout.)
pub struct LlmClassifier {
    generator: Arc<dyn TextGenerator>,
    history_turns: usize,
}

impl LlmClassifier {
    /// Create a classifier over the given generator.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, history_turns: DEFAULT_HISTORY_TURNS }
    }

    /// Set how many prior turns the routing prompt includes.
    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    fn routing_prompt(&self, query: &Query, history: &ConversationState) -> String {
        let mut prompt = String::from(
            "You route questions about a movie catalog to one of two stores.\n\n\
             1. STRUCTURED — a relational database of rental statistics and title \
             metadata: rental counts, popularity rankings, ratings, release years, \
             languages.\n\
             2. SEMANTIC — a plot-summary index: stories, themes, characters, \
             finding films similar to another.\n\n\
             Answer STRUCTURED for rental/count/ranking/metadata questions, \
             SEMANTIC for plot/theme/content questions, and BOTH only when the \
             question needs rental data combined with plot detail.\n",
        );

        let turns: Vec<_> = history.recent(self.history_turns).collect();
        if !turns.is_empty() {
            prompt.push_str("\nRecent conversation:\n");
            for turn in turns {
                prompt.push_str(&format!("User asked: {}\n", turn.query.text));
                prompt.push_str(&format!("Assistant answered: {}\n", turn.answer));
            }
        }

        prompt.push_str(&format!(
            "\nQuestion: {}\n\nReply with exactly one word: STRUCTURED, SEMANTIC, or BOTH.",
            query.text
        ));
        prompt
    }
}

/// Extract a route from a model reply, tolerating surrounding prose.
fn parse_route(reply: &str) -> Option<Route> {
    let upper = reply.to_uppercase();
    let structured = upper.contains("STRUCTURED");
    let semantic = upper.contains("SEMANTIC");
    if upper.contains("BOTH") || (structured && semantic) {
        return Some(Route::Both);
    }
    if structured {
        return Some(Route::Structured);
    }
    if semantic {
        return Some(Route::Semantic);
    }
    None
}

#[async_trait]
impl Classifier for LlmClassifier {
    async fn classify(&self, query: &Query, history: &ConversationState) -> ClassificationResult {
        let request =
            GenerateRequest::new(self.routing_prompt(query, history)).with_temperature(0.0);

        let reply = match self.generator.generate(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(error = %err, "routing model unavailable");
                return ClassificationResult::unavailable();
            }
        };

        match parse_route(&reply) {
            Some(route) => {
                debug!(%route, reply = reply.trim(), "model routed query");
                ClassificationResult::new(route, MODEL_CONFIDENCE, "model-routed")
            }
            None => {
                warn!(reply = reply.trim(), "unrecognized route reply");
                ClassificationResult::new(Route::Both, 0.0, "unrecognized route reply")
            }
        }
    }
}
