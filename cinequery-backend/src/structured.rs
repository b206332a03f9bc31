//! HTTP adapter for the structured (relational) query service.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use cinequery_core::{
    AdapterRequest, AdapterResponse, BackendKind, CineError, Result, ResultItem, StructuredRecord,
};

use crate::adapter::{BackendAdapter, run_guarded};
use crate::error::BackendError;

/// Adapter for the relational query service.
///
/// POSTs `{ "text": ..., "limit": ... }` to the configured endpoint and
/// expects tabular rows back. The service owns the schema and the SQL; this
/// adapter only speaks the row contract.
///
/// # Example
///
/// ```rust,ignore
/// let backend = StructuredHttpBackend::new("http://localhost:8001/sql")?;
/// let response = backend.invoke(&request).await;
/// ```
#[derive(Debug)]
pub struct StructuredHttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl StructuredHttpBackend {
    /// Create an adapter for the service at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if `endpoint` is empty.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(CineError::Config("structured endpoint must not be empty".to_string()));
        }
        Ok(Self { client: reqwest::Client::new(), endpoint })
    }

    async fn fetch(&self, request: &AdapterRequest) -> std::result::Result<Vec<ResultItem>, BackendError> {
        let body = RowsRequest { text: &request.text, limit: request.top_k };

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

        let rows: RowsResponse =
            response.json().await.map_err(|e| BackendError::Decode(e.to_string()))?;

        let mut items: Vec<ResultItem> =
            rows.rows.into_iter().map(ResultItem::Structured).collect();
        items.truncate(request.top_k);
        Ok(items)
    }
}

#[async_trait]
impl BackendAdapter for StructuredHttpBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Structured
    }

    fn name(&self) -> &str {
        "structured-http"
    }

    async fn invoke(&self, request: &AdapterRequest) -> AdapterResponse {
        run_guarded(self.kind(), self.name(), request, self.fetch(request)).await
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct RowsRequest<'a> {
    text: &'a str,
    limit: usize,
}

#[derive(Deserialize)]
struct RowsResponse {
    rows: Vec<StructuredRecord>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: String,
}
