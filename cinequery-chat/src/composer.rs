//! Turns merged results into the final natural-language answer.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cinequery_core::{
    Answer, GenerateRequest, MergedResult, Query, ResultItem, SemanticRecord, StructuredRecord,
    TextGenerator,
};
use cinequery_session::ConversationState;

/// The fixed reply when no backend produced anything usable.
pub const INSUFFICIENT_ANSWER: &str =
    "I don't have enough information in the movie catalog to answer that.";

/// Tunables for the [`Composer`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComposerConfig {
    /// How many prior turns to include as grounding context.
    pub history_turns: usize,
    /// Replies longer than this are treated as invalid and replaced by the
    /// templated answer.
    pub max_reply_chars: usize,
    /// Sampling temperature for the phrasing call.
    pub temperature: f32,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self { history_turns: 3, max_reply_chars: 4000, temperature: 0.2 }
    }
}

/// Composes one [`Answer`] per query from the merged result set.
///
/// Never returns an error: an empty result set yields the fixed
/// [`INSUFFICIENT_ANSWER`], and a failing (or empty-/overlong-replying)
/// generator yields a deterministic listing built straight from the items.
pub struct Composer {
    generator: Arc<dyn TextGenerator>,
    config: ComposerConfig,
}

impl Composer {
    /// Create a composer over the given generator with default config.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator, config: ComposerConfig::default() }
    }

    /// Replace the composer configuration.
    pub fn with_config(mut self, config: ComposerConfig) -> Self {
        self.config = config;
        self
    }

    /// Compose the final answer for `query` from `merged`.
    pub async fn compose(
        &self,
        query: &Query,
        merged: &MergedResult,
        history: &ConversationState,
    ) -> Answer {
        if merged.is_empty() {
            return Answer {
                text: INSUFFICIENT_ANSWER.to_string(),
                sources: merged.sources_used.clone(),
                degraded: merged.degraded,
            };
        }

        let digest = digest(&merged.items);
        let prompt = self.grounding_prompt(query, &digest, history);
        let request =
            GenerateRequest::new(prompt).with_temperature(self.config.temperature);

        let text = match self.generator.generate(&request).await {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() || reply.chars().count() > self.config.max_reply_chars {
                    warn!(
                        reply_chars = reply.chars().count(),
                        "generator reply failed validation; using templated answer"
                    );
                    fallback_answer(&merged.items)
                } else {
                    debug!(reply_chars = reply.chars().count(), "composed answer");
                    reply.to_string()
                }
            }
            Err(err) => {
                warn!(error = %err, "generator failed; using templated answer");
                fallback_answer(&merged.items)
            }
        };

        Answer { text, sources: merged.sources_used.clone(), degraded: merged.degraded }
    }

    fn grounding_prompt(&self, query: &Query, digest: &str, history: &ConversationState) -> String {
        let mut prompt = String::from(
            "You are a movie assistant. Answer the user's question using only the \
             catalog information below. Integrate rental statistics and plot details \
             where both are present, and say plainly when something the user asked \
             for is missing from the catalog. Be concise and friendly.\n",
        );

        let turns: Vec<_> = history.recent(self.config.history_turns).collect();
        if !turns.is_empty() {
            prompt.push_str("\nRecent conversation:\n");
            for turn in turns {
                let _ = writeln!(prompt, "User asked: {}", turn.query.text);
                let _ = writeln!(prompt, "Assistant answered: {}", turn.answer);
            }
        }

        let _ = write!(prompt, "\nCatalog information:\n{digest}\nQuestion: {}", query.text);
        prompt
    }
}

/// One line per item, in merge order.
fn digest(items: &[ResultItem]) -> String {
    let mut out = String::new();
    for item in items {
        match item {
            ResultItem::Structured(row) => {
                let _ = writeln!(out, "- {}", structured_line(row));
            }
            ResultItem::Semantic(rec) => {
                let _ = writeln!(out, "- {}", semantic_line(rec));
            }
            ResultItem::Composite(c) => {
                let _ = writeln!(
                    out,
                    "- {} Plot: {}",
                    structured_line(&c.structured),
                    c.semantic.excerpt
                );
            }
        }
    }
    out
}

fn structured_line(row: &StructuredRecord) -> String {
    let mut line = row.title.clone();
    if let Some(year) = row.release_year {
        let _ = write!(line, " ({year})");
    }
    let _ = write!(line, ":");
    if let Some(count) = row.rental_count {
        let _ = write!(line, " {count} rentals,");
    }
    if let Some(rating) = &row.rating {
        let _ = write!(line, " rated {rating},");
    }
    if let Some(language) = &row.language {
        let _ = write!(line, " in {language},");
    }
    line.truncate(line.trim_end_matches([',', ':']).len());
    line.push('.');
    line
}

fn semantic_line(rec: &SemanticRecord) -> String {
    let mut line = rec.title.clone();
    if let Some(year) = rec.release_year {
        let _ = write!(line, " ({year})");
    }
    if let Some(genres) = &rec.genres {
        let _ = write!(line, " [{genres}]");
    }
    let _ = write!(line, ": {}", rec.excerpt);
    line
}

/// The deterministic answer used when the generator is unavailable.
fn fallback_answer(items: &[ResultItem]) -> String {
    format!("Here is what the movie catalog shows:\n{}", digest(items))
}
