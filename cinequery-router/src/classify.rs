//! The intent classification capability.

use async_trait::async_trait;

use cinequery_core::{ClassificationResult, Query};
use cinequery_session::ConversationState;

/// Decides which backend(s) a query should use.
///
/// Classification is a pure function of the query and recent history, and
/// is infallible by contract: an implementation whose underlying mechanism
/// can fail must fall back to
/// [`ClassificationResult::unavailable`](cinequery_core::ClassificationResult::unavailable)
/// (route both ways, confidence zero) rather than error or block the
/// pipeline.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one query in the context of its conversation.
    async fn classify(&self, query: &Query, history: &ConversationState) -> ClassificationResult;
}
