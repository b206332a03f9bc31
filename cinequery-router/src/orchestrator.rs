//! The router/orchestrator: classify, fan out, merge.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

use cinequery_backend::BackendAdapter;
use cinequery_core::{
    AdapterRequest, AdapterResponse, CineError, ClassificationResult, MergedResult, Query, Result,
    Route,
};
use cinequery_session::ConversationState;

use crate::classify::Classifier;
use crate::config::RouterConfig;
use crate::merge;

/// Routes one query to the backend(s) it needs and merges their responses.
///
/// Failure semantics: adapter timeouts and errors are isolated per adapter
/// and converted to response data — they never abort the other in-flight
/// adapter and never surface as `Err`. The only error `handle` returns is
/// [`CineError::InvalidQuery`] for an empty query, raised before any
/// backend work. There is no retry inside a `handle` call; retry, if any,
/// is a caller-level policy over the whole invocation.
///
/// Construct via [`Orchestrator::builder()`].
pub struct Orchestrator {
    classifier: Arc<dyn Classifier>,
    structured: Arc<dyn BackendAdapter>,
    semantic: Arc<dyn BackendAdapter>,
    config: RouterConfig,
}

impl Orchestrator {
    /// Create a new [`OrchestratorBuilder`].
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Return a reference to the orchestrator configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Handle one query: classify, fan out, merge.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::InvalidQuery`] if the query text is empty after
    /// trimming. Backend failures degrade the [`MergedResult`] instead.
    pub async fn handle(
        &self,
        query: &Query,
        history: &ConversationState,
    ) -> Result<MergedResult> {
        if query.trimmed().is_empty() {
            return Err(CineError::InvalidQuery("query text is empty".to_string()));
        }

        let deadline = Instant::now() + self.config.query_deadline;

        let classification = match tokio::time::timeout(
            self.config.classify_timeout,
            self.classifier.classify(query, history),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(query_id = %query.id, "classifier timed out");
                ClassificationResult::unavailable()
            }
        };
        info!(
            query_id = %query.id,
            route = %classification.route,
            confidence = classification.confidence,
            reasoning = %classification.reasoning,
            "routed query"
        );

        let merged = match classification.route {
            Route::Structured => {
                merge::merge_single(self.invoke(self.structured.as_ref(), query, deadline).await)
            }
            Route::Semantic => {
                merge::merge_single(self.invoke(self.semantic.as_ref(), query, deadline).await)
            }
            Route::Both => {
                let (structured, semantic) = tokio::join!(
                    self.invoke(self.structured.as_ref(), query, deadline),
                    self.invoke(self.semantic.as_ref(), query, deadline),
                );
                merge::merge_dual(structured, semantic, self.config.merge_policy)
            }
        };

        if merged.degraded && merged.sources_used.is_empty() {
            warn!(query_id = %query.id, "all routed backends failed");
        } else if merged.degraded {
            warn!(query_id = %query.id, sources = ?merged.sources_used, "degraded result");
        }

        Ok(merged)
    }

    /// Invoke one adapter under the per-adapter budget, capped by the
    /// remaining query deadline.
    async fn invoke(
        &self,
        adapter: &dyn BackendAdapter,
        query: &Query,
        deadline: Instant,
    ) -> AdapterResponse {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return AdapterResponse::error(adapter.kind(), "query deadline exceeded", Duration::ZERO);
        }

        let timeout = self.config.adapter_timeout.min(remaining);
        let request = AdapterRequest {
            text: query.text.clone(),
            top_k: self.config.top_k,
            query_id: query.id,
            timeout,
        };

        // The adapter contract already honors request.timeout; the outer
        // guard keeps a misbehaving adapter from stalling the query anyway.
        match tokio::time::timeout(timeout, adapter.invoke(&request)).await {
            Ok(response) => response,
            Err(_) => AdapterResponse::error(adapter.kind(), "timeout", timeout),
        }
    }
}

/// Builder for constructing an [`Orchestrator`].
///
/// Classifier and both adapters are required; the config defaults.
#[derive(Default)]
pub struct OrchestratorBuilder {
    classifier: Option<Arc<dyn Classifier>>,
    structured: Option<Arc<dyn BackendAdapter>>,
    semantic: Option<Arc<dyn BackendAdapter>>,
    config: Option<RouterConfig>,
}

impl OrchestratorBuilder {
    /// Set the intent classifier.
    pub fn classifier(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the structured backend adapter.
    pub fn structured(mut self, adapter: Arc<dyn BackendAdapter>) -> Self {
        self.structured = Some(adapter);
        self
    }

    /// Set the semantic backend adapter.
    pub fn semantic(mut self, adapter: Arc<dyn BackendAdapter>) -> Self {
        self.semantic = Some(adapter);
        self
    }

    /// Set the orchestrator configuration.
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the [`Orchestrator`], validating that all required parts are set.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if the classifier or either adapter is
    /// missing.
    pub fn build(self) -> Result<Orchestrator> {
        let classifier = self
            .classifier
            .ok_or_else(|| CineError::Config("classifier is required".to_string()))?;
        let structured = self
            .structured
            .ok_or_else(|| CineError::Config("structured adapter is required".to_string()))?;
        let semantic = self
            .semantic
            .ok_or_else(|| CineError::Config("semantic adapter is required".to_string()))?;

        Ok(Orchestrator {
            classifier,
            structured,
            semantic,
            config: self.config.unwrap_or_default(),
        })
    }
}
