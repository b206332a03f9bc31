//! Backend request/response types, result items, and the merged result set.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::route::BackendKind;

/// One adapter invocation. Built by the orchestrator, one instance per
/// backend fan-out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdapterRequest {
    /// The query text to send to the backend.
    pub text: String,
    /// Maximum number of items the backend should return.
    pub top_k: usize,
    /// Id of the originating [`Query`](crate::Query).
    pub query_id: Uuid,
    /// Budget for the whole invocation; on expiry the adapter returns
    /// `status = Error` with detail `"timeout"`.
    pub timeout: Duration,
}

/// Outcome classification of one adapter invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The backend returned at least one item.
    Ok,
    /// The backend responded but had nothing relevant.
    Empty,
    /// The backend failed or timed out; `detail` carries the reason.
    Error,
}

/// The uniform response every backend adapter returns.
///
/// Adapters never return `Err` past their boundary: failures are captured
/// here as `status = Error` with empty items. The orchestrator owns the
/// response exclusively once it is returned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdapterResponse {
    /// Which backend produced this response.
    pub backend: BackendKind,
    /// Outcome of the invocation.
    pub status: ResponseStatus,
    /// Retrieved items, in backend order (structured: requested sort key;
    /// semantic: descending similarity). Empty unless `status = Ok`.
    pub items: Vec<ResultItem>,
    /// Wall-clock duration of the invocation.
    pub latency: Duration,
    /// Error detail when `status = Error` (e.g. `"timeout"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AdapterResponse {
    /// A successful response; empty `items` becomes `status = Empty`.
    pub fn ok(backend: BackendKind, items: Vec<ResultItem>, latency: Duration) -> Self {
        let status = if items.is_empty() { ResponseStatus::Empty } else { ResponseStatus::Ok };
        Self { backend, status, items, latency, detail: None }
    }

    /// A failed response with empty items and an error detail.
    pub fn error(backend: BackendKind, detail: impl Into<String>, latency: Duration) -> Self {
        Self {
            backend,
            status: ResponseStatus::Error,
            items: Vec::new(),
            latency,
            detail: Some(detail.into()),
        }
    }

    /// Whether this response carries usable items.
    pub fn is_ok(&self) -> bool {
        self.status == ResponseStatus::Ok
    }
}

/// A row from the structured (relational) backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredRecord {
    /// Film title.
    pub title: String,
    /// Number of rentals on record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_count: Option<u64>,
    /// MPAA-style rating (G, PG, R, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    /// Release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    /// Original language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A ranked match from the semantic (retrieval) backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticRecord {
    /// Film title.
    pub title: String,
    /// Plot excerpt or summary snippet that matched the query.
    pub excerpt: String,
    /// Similarity to the query, higher is closer.
    pub similarity_score: f32,
    /// Release year, when the index carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
    /// Genre labels, when the index carries them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    /// Principal cast, when the index carries it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actors: Option<String>,
}

/// A cross-source combination: the structured record's quantitative fields
/// together with the semantic record's descriptive fields for the same title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompositeRecord {
    /// The structured half (rentals, rating, language).
    pub structured: StructuredRecord,
    /// The semantic half (excerpt, similarity).
    pub semantic: SemanticRecord,
}

/// A backend-tagged result record.
///
/// Consumers must dispatch on the tag and not assume fields beyond the
/// variant's schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ResultItem {
    /// A row from the relational store.
    Structured(StructuredRecord),
    /// A ranked match from the retrieval store.
    Semantic(SemanticRecord),
    /// A cross-source combination for a title present in both sets.
    Composite(CompositeRecord),
}

impl ResultItem {
    /// The film title this item refers to.
    pub fn title(&self) -> &str {
        match self {
            ResultItem::Structured(r) => &r.title,
            ResultItem::Semantic(r) => &r.title,
            ResultItem::Composite(r) => &r.structured.title,
        }
    }

    /// The backend(s) that contributed this item.
    pub fn sources(&self) -> &'static [BackendKind] {
        match self {
            ResultItem::Structured(_) => &[BackendKind::Structured],
            ResultItem::Semantic(_) => &[BackendKind::Semantic],
            ResultItem::Composite(_) => &[BackendKind::Structured, BackendKind::Semantic],
        }
    }
}

/// The orchestrator's merged view over one query's adapter responses.
///
/// Invariant: `degraded` is true exactly when at least one invoked adapter
/// returned a non-`Ok` status (or the per-query deadline cut an invocation
/// short); the caller still gets whatever the remaining source produced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedResult {
    /// Merged items, each source's internal order preserved.
    pub items: Vec<ResultItem>,
    /// Backends that returned `status = Ok`.
    pub sources_used: BTreeSet<BackendKind>,
    /// Whether any invoked backend failed or returned nothing usable.
    pub degraded: bool,
}

impl MergedResult {
    /// The total-failure outcome: no items, no sources, degraded.
    pub fn total_failure() -> Self {
        Self { items: Vec::new(), sources_used: BTreeSet::new(), degraded: true }
    }

    /// Whether the merge produced no items at all.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The final composed reply for one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    /// Natural-language answer text.
    pub text: String,
    /// Backends whose data contributed to the answer.
    pub sources: BTreeSet<BackendKind>,
    /// Whether the answer was produced despite partial backend failure.
    pub degraded: bool,
}
