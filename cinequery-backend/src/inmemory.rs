//! In-memory catalog adapters for development, offline runs, and tests.
//!
//! Both adapters rank a seeded catalog with naive token matching. They are
//! not retrieval engines; they exist so the routing core can be exercised
//! end to end without the relational or vector services running.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;

use cinequery_core::{
    AdapterRequest, AdapterResponse, BackendKind, ResultItem, SemanticRecord, StructuredRecord,
};

use crate::adapter::{BackendAdapter, run_guarded};
use crate::error::BackendError;

/// Lowercased alphanumeric tokens of at least three characters.
fn tokens(text: &str) -> BTreeSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() >= 3)
        .map(str::to_string)
        .collect()
}

/// A catalog-seeded fake of the relational backend.
///
/// Rows whose titles share a token with the query are kept; when no title
/// matches, the query is treated as a ranking question over the whole
/// catalog. Either way rows come back sorted by rental count descending,
/// the default sort key.
pub struct InMemoryStructuredBackend {
    rows: Vec<StructuredRecord>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl InMemoryStructuredBackend {
    /// Create a fake backend over the given rows.
    pub fn new(rows: Vec<StructuredRecord>) -> Self {
        Self { rows, failure: None, delay: None }
    }

    /// Make every invocation fail with `detail`.
    pub fn with_failure(mut self, detail: impl Into<String>) -> Self {
        self.failure = Some(detail.into());
        self
    }

    /// Sleep before answering, to exercise timeout and latency paths.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<Vec<ResultItem>, BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(detail) = &self.failure {
            return Err(BackendError::Transport(detail.clone()));
        }

        let query_tokens = tokens(&request.text);
        let mut rows: Vec<&StructuredRecord> = self
            .rows
            .iter()
            .filter(|row| !tokens(&row.title).is_disjoint(&query_tokens))
            .collect();
        if rows.is_empty() {
            rows = self.rows.iter().collect();
        }

        rows.sort_by(|a, b| b.rental_count.unwrap_or(0).cmp(&a.rental_count.unwrap_or(0)));
        rows.truncate(request.top_k);

        Ok(rows.into_iter().cloned().map(ResultItem::Structured).collect())
    }
}

#[async_trait]
impl BackendAdapter for InMemoryStructuredBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Structured
    }

    fn name(&self) -> &str {
        "structured-inmemory"
    }

    async fn invoke(&self, request: &AdapterRequest) -> AdapterResponse {
        run_guarded(self.kind(), self.name(), request, self.fetch(request)).await
    }
}

/// A catalog-seeded fake of the retrieval backend.
///
/// Scores each record by token overlap between the query and the record's
/// title, excerpt, and genres; records with no overlap are dropped, the
/// rest come back in descending score order with `similarity_score` set.
pub struct InMemorySemanticBackend {
    records: Vec<SemanticRecord>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl InMemorySemanticBackend {
    /// Create a fake backend over the given records.
    pub fn new(records: Vec<SemanticRecord>) -> Self {
        Self { records, failure: None, delay: None }
    }

    /// Make every invocation fail with `detail`.
    pub fn with_failure(mut self, detail: impl Into<String>) -> Self {
        self.failure = Some(detail.into());
        self
    }

    /// Sleep before answering, to exercise timeout and latency paths.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn fetch(&self, request: &AdapterRequest) -> Result<Vec<ResultItem>, BackendError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(detail) = &self.failure {
            return Err(BackendError::Transport(detail.clone()));
        }

        let query_tokens = tokens(&request.text);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<SemanticRecord> = self
            .records
            .iter()
            .filter_map(|record| {
                let haystack = format!(
                    "{} {} {}",
                    record.title,
                    record.excerpt,
                    record.genres.as_deref().unwrap_or_default()
                );
                let overlap = tokens(&haystack).intersection(&query_tokens).count();
                if overlap == 0 {
                    return None;
                }
                let mut hit = record.clone();
                hit.similarity_score = overlap as f32 / query_tokens.len() as f32;
                Some(hit)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity_score
                .partial_cmp(&a.similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(request.top_k);

        Ok(scored.into_iter().map(ResultItem::Semantic).collect())
    }
}

#[async_trait]
impl BackendAdapter for InMemorySemanticBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Semantic
    }

    fn name(&self) -> &str {
        "semantic-inmemory"
    }

    async fn invoke(&self, request: &AdapterRequest) -> AdapterResponse {
        run_guarded(self.kind(), self.name(), request, self.fetch(request)).await
    }
}
