//! Routing, concurrency, and degradation tests for the orchestrator.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use cinequery_backend::BackendAdapter;
use cinequery_core::{
    AdapterRequest, AdapterResponse, BackendKind, CineError, ClassificationResult, Query,
    ResultItem, Route, SemanticRecord, StructuredRecord,
};
use cinequery_router::{Classifier, Orchestrator, RouterConfig};
use cinequery_session::ConversationState;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// A classifier that always picks the same route.
struct FixedClassifier(Route);

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _query: &Query, _history: &ConversationState) -> ClassificationResult {
        ClassificationResult::new(self.0, 1.0, "fixed")
    }
}

/// A classifier that never answers in time.
struct StalledClassifier;

#[async_trait]
impl Classifier for StalledClassifier {
    async fn classify(&self, _query: &Query, _history: &ConversationState) -> ClassificationResult {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        ClassificationResult::new(Route::Structured, 1.0, "too late")
    }
}

/// A scriptable adapter that counts invocations.
///
/// Deliberately ignores `request.timeout` so the tests also cover the
/// orchestrator's outer guard against misbehaving adapters.
struct RecordingAdapter {
    kind: BackendKind,
    items: Vec<ResultItem>,
    delay: Option<Duration>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl RecordingAdapter {
    fn new(kind: BackendKind, items: Vec<ResultItem>) -> Self {
        Self { kind, items, delay: None, failure: None, calls: AtomicUsize::new(0) }
    }

    fn failing(kind: BackendKind, detail: &str) -> Self {
        Self {
            kind,
            items: Vec::new(),
            delay: None,
            failure: Some(detail.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendAdapter for RecordingAdapter {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn name(&self) -> &str {
        "recording"
    }

    async fn invoke(&self, _request: &AdapterRequest) -> AdapterResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(detail) = &self.failure {
            return AdapterResponse::error(self.kind, detail.clone(), Duration::ZERO);
        }
        AdapterResponse::ok(self.kind, self.items.clone(), Duration::from_millis(1))
    }
}

fn row(title: &str, rentals: u64) -> ResultItem {
    ResultItem::Structured(StructuredRecord {
        title: title.to_string(),
        rental_count: Some(rentals),
        rating: None,
        release_year: None,
        language: None,
    })
}

fn summary(title: &str, score: f32) -> ResultItem {
    ResultItem::Semantic(SemanticRecord {
        title: title.to_string(),
        excerpt: format!("{title} excerpt"),
        similarity_score: score,
        release_year: None,
        genres: None,
        actors: None,
    })
}

fn orchestrator(
    classifier: Arc<dyn Classifier>,
    structured: Arc<RecordingAdapter>,
    semantic: Arc<RecordingAdapter>,
    config: RouterConfig,
) -> Orchestrator {
    Orchestrator::builder()
        .classifier(classifier)
        .structured(structured)
        .semantic(semantic)
        .config(config)
        .build()
        .unwrap()
}

fn query(text: &str) -> Query {
    Query::new(text, 0)
}

// ---------------------------------------------------------------------------
// Routing exclusivity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn structured_route_never_invokes_the_semantic_adapter() {
    let structured = Arc::new(RecordingAdapter::new(
        BackendKind::Structured,
        vec![row("Bucket Brotherhood", 34)],
    ));
    let semantic = Arc::new(RecordingAdapter::new(BackendKind::Semantic, vec![]));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Structured)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let merged = orch.handle(&query("top rentals"), &ConversationState::default()).await.unwrap();

    assert_eq!(structured.calls(), 1);
    assert_eq!(semantic.calls(), 0);
    assert_eq!(merged.items, vec![row("Bucket Brotherhood", 34)]);
    assert!(!merged.degraded);
    assert!(merged.sources_used.contains(&BackendKind::Structured));
}

#[tokio::test]
async fn semantic_route_never_invokes_the_structured_adapter() {
    let structured = Arc::new(RecordingAdapter::new(BackendKind::Structured, vec![]));
    let semantic = Arc::new(RecordingAdapter::new(
        BackendKind::Semantic,
        vec![summary("Chamber Italian", 0.9)],
    ));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Semantic)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let merged =
        orch.handle(&query("time travel plots"), &ConversationState::default()).await.unwrap();

    assert_eq!(structured.calls(), 0);
    assert_eq!(semantic.calls(), 1);
    assert_eq!(merged.items, vec![summary("Chamber Italian", 0.9)]);
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn both_route_runs_adapters_concurrently() {
    let structured = Arc::new(
        RecordingAdapter::new(BackendKind::Structured, vec![row("Apache Divine", 31)])
            .with_delay(Duration::from_millis(80)),
    );
    let semantic = Arc::new(
        RecordingAdapter::new(BackendKind::Semantic, vec![summary("Outlaw Saturn", 0.7)])
            .with_delay(Duration::from_millis(50)),
    );
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let started = tokio::time::Instant::now();
    let merged =
        orch.handle(&query("rentals and plots"), &ConversationState::default()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(structured.calls(), 1);
    assert_eq!(semantic.calls(), 1);
    assert_eq!(merged.items.len(), 2);
    // max(80ms, 50ms), not the 130ms sum.
    assert!(elapsed >= Duration::from_millis(80), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(130), "elapsed {elapsed:?}");
}

// ---------------------------------------------------------------------------
// Degradation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn one_error_one_ok_degrades_to_the_ok_set() {
    let structured = Arc::new(RecordingAdapter::failing(BackendKind::Structured, "db down"));
    let semantic = Arc::new(RecordingAdapter::new(
        BackendKind::Semantic,
        vec![summary("Chamber Italian", 0.9), summary("Outlaw Saturn", 0.4)],
    ));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let merged =
        orch.handle(&query("rentals and plots"), &ConversationState::default()).await.unwrap();

    assert!(merged.degraded);
    assert_eq!(
        merged.items,
        vec![summary("Chamber Italian", 0.9), summary("Outlaw Saturn", 0.4)]
    );
    assert_eq!(merged.sources_used.len(), 1);
    assert!(merged.sources_used.contains(&BackendKind::Semantic));
}

#[tokio::test]
async fn both_errors_are_a_total_failure_not_a_silent_success() {
    let structured = Arc::new(RecordingAdapter::failing(BackendKind::Structured, "db down"));
    let semantic = Arc::new(RecordingAdapter::failing(BackendKind::Semantic, "index down"));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let merged =
        orch.handle(&query("rentals and plots"), &ConversationState::default()).await.unwrap();

    assert!(merged.degraded);
    assert!(merged.items.is_empty());
    assert!(merged.sources_used.is_empty());
}

#[tokio::test(start_paused = true)]
async fn slow_adapter_times_out_without_stalling_the_other() {
    let structured = Arc::new(
        RecordingAdapter::new(BackendKind::Structured, vec![row("Apache Divine", 31)])
            .with_delay(Duration::from_secs(3600)),
    );
    let semantic = Arc::new(RecordingAdapter::new(
        BackendKind::Semantic,
        vec![summary("Chamber Italian", 0.9)],
    ));
    let config = RouterConfig::builder()
        .adapter_timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        config,
    );

    let started = tokio::time::Instant::now();
    let merged =
        orch.handle(&query("rentals and plots"), &ConversationState::default()).await.unwrap();

    assert!(merged.degraded);
    assert_eq!(merged.items, vec![summary("Chamber Italian", 0.9)]);
    assert!(started.elapsed() < Duration::from_secs(1), "timeout was not enforced");
}

#[tokio::test(start_paused = true)]
async fn query_deadline_caps_the_adapter_budget() {
    let structured = Arc::new(
        RecordingAdapter::new(BackendKind::Structured, vec![row("Apache Divine", 31)])
            .with_delay(Duration::from_secs(3600)),
    );
    let semantic = Arc::new(RecordingAdapter::new(
        BackendKind::Semantic,
        vec![summary("Chamber Italian", 0.9)],
    ));
    let config = RouterConfig::builder()
        .adapter_timeout(Duration::from_secs(10))
        .query_deadline(Duration::from_millis(200))
        .build()
        .unwrap();
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        config,
    );

    let started = tokio::time::Instant::now();
    let merged =
        orch.handle(&query("rentals and plots"), &ConversationState::default()).await.unwrap();
    let elapsed = started.elapsed();

    assert!(merged.degraded);
    assert_eq!(merged.items, vec![summary("Chamber Italian", 0.9)]);
    assert!(elapsed < Duration::from_millis(300), "deadline was not enforced: {elapsed:?}");
}

// ---------------------------------------------------------------------------
// Classification failure and input validation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stalled_classifier_falls_back_to_both() {
    let structured = Arc::new(RecordingAdapter::new(
        BackendKind::Structured,
        vec![row("Apache Divine", 31)],
    ));
    let semantic = Arc::new(RecordingAdapter::new(
        BackendKind::Semantic,
        vec![summary("Chamber Italian", 0.9)],
    ));
    let config =
        RouterConfig::builder().classify_timeout(Duration::from_millis(100)).build().unwrap();
    let orch = orchestrator(
        Arc::new(StalledClassifier),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        config,
    );

    let merged = orch.handle(&query("anything"), &ConversationState::default()).await.unwrap();

    assert_eq!(structured.calls(), 1);
    assert_eq!(semantic.calls(), 1);
    assert_eq!(merged.items.len(), 2);
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_backend_work() {
    let structured = Arc::new(RecordingAdapter::new(BackendKind::Structured, vec![]));
    let semantic = Arc::new(RecordingAdapter::new(BackendKind::Semantic, vec![]));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Both)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let err = orch.handle(&query("   "), &ConversationState::default()).await.unwrap_err();

    assert!(matches!(err, CineError::InvalidQuery(_)));
    assert_eq!(structured.calls(), 0);
    assert_eq!(semantic.calls(), 0);
}

#[tokio::test]
async fn handle_is_idempotent_under_unchanged_backends() {
    let structured = Arc::new(RecordingAdapter::new(
        BackendKind::Structured,
        vec![row("Bucket Brotherhood", 34), row("Apache Divine", 31)],
    ));
    let semantic = Arc::new(RecordingAdapter::new(BackendKind::Semantic, vec![]));
    let orch = orchestrator(
        Arc::new(FixedClassifier(Route::Structured)),
        Arc::clone(&structured),
        Arc::clone(&semantic),
        RouterConfig::default(),
    );

    let q = query("top rentals");
    let first = orch.handle(&q, &ConversationState::default()).await.unwrap();
    let second = orch.handle(&q, &ConversationState::default()).await.unwrap();

    assert_eq!(first.items, second.items);
    assert_eq!(first.sources_used, second.sources_used);
    assert_eq!(structured.calls(), 2);
}
