//! Routing decision types produced by the intent classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which backend(s) a query should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Only the structured (relational) backend.
    Structured,
    /// Only the semantic (retrieval) backend.
    Semantic,
    /// Both backends, invoked concurrently.
    Both,
}

impl Route {
    /// The backends this route fans out to.
    pub fn backends(self) -> &'static [BackendKind] {
        match self {
            Route::Structured => &[BackendKind::Structured],
            Route::Semantic => &[BackendKind::Semantic],
            Route::Both => &[BackendKind::Structured, BackendKind::Semantic],
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Structured => write!(f, "structured"),
            Route::Semantic => write!(f, "semantic"),
            Route::Both => write!(f, "both"),
        }
    }
}

/// Identity tag for a backend, carried on every adapter response and result
/// item so consumers never branch on concrete adapter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The relational store: rental statistics and title metadata.
    Structured,
    /// The retrieval store: plot summaries and thematic content.
    Semantic,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Structured => write!(f, "structured"),
            BackendKind::Semantic => write!(f, "semantic"),
        }
    }
}

/// The classifier's decision for one query. Produced once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    /// The chosen route.
    pub route: Route,
    /// Confidence in the decision, clamped to `[0.0, 1.0]`.
    pub confidence: f32,
    /// Short human-readable rationale (cue counts, fallback marker, etc.).
    pub reasoning: String,
}

impl ClassificationResult {
    /// Create a classification result, clamping `confidence` into `[0.0, 1.0]`.
    pub fn new(route: Route, confidence: f32, reasoning: impl Into<String>) -> Self {
        Self { route, confidence: confidence.clamp(0.0, 1.0), reasoning: reasoning.into() }
    }

    /// The fallback used when the classification mechanism itself fails or
    /// times out: route to both backends so no answerable query is dropped.
    pub fn unavailable() -> Self {
        Self::new(Route::Both, 0.0, "classifier-unavailable")
    }
}
