//! HTTP adapter for the semantic (plot-summary retrieval) service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cinequery_core::{
    AdapterRequest, AdapterResponse, BackendKind, CineError, Result, ResultItem, SemanticRecord,
};

use crate::adapter::{BackendAdapter, run_guarded};
use crate::error::BackendError;

/// Adapter for the plot-summary retrieval service.
///
/// POSTs `{ "text": ..., "k": ... }` to the configured endpoint and expects
/// ranked matches back. Descending-similarity order is enforced on decode,
/// so a service that returns matches unsorted still satisfies the adapter
/// ordering guarantee.
#[derive(Debug)]
pub struct SemanticHttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl SemanticHttpBackend {
    /// Create an adapter for the service at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if `endpoint` is empty.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(CineError::Config("semantic endpoint must not be empty".to_string()));
        }
        Ok(Self { client: reqwest::Client::new(), endpoint })
    }

    async fn fetch(&self, request: &AdapterRequest) -> std::result::Result<Vec<ResultItem>, BackendError> {
        let body = SearchRequest { text: &request.text, k: request.top_k };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(BackendError::Api { status, detail });
        }

        let search: SearchResponse =
            response.json().await.map_err(|e| BackendError::Decode(e.to_string()))?;

        let mut matches = search.matches;
        matches.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(request.top_k);

        Ok(matches.into_iter().map(ResultItem::Semantic).collect())
    }
}

#[async_trait]
impl BackendAdapter for SemanticHttpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Semantic
    }

    fn name(&self) -> &str {
        "semantic-http"
    }

    async fn invoke(&self, request: &AdapterRequest) -> AdapterResponse {
        run_guarded(self.kind(), self.name(), request, self.fetch(request)).await
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct SearchRequest<'a> {
    text: &'a str,
    k: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    matches: Vec<SemanticRecord>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}
