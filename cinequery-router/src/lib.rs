//! # cinequery-router
//!
//! Intent classification and query orchestration for CineQuery.
//!
//! ## Overview
//!
//! The [`Orchestrator`] is the heart of the routing core. Per query it:
//!
//! 1. asks a [`Classifier`] which backend(s) the question needs —
//!    structured (rental statistics, title metadata), semantic (plot
//!    summaries, themes), or both;
//! 2. fans out to the routed adapter(s) concurrently, each invocation
//!    bounded by the adapter timeout and the per-query deadline;
//! 3. merges the responses into one [`MergedResult`](cinequery_core::MergedResult),
//!    isolating failures per backend and marking the result degraded
//!    instead of failing the query.
//!
//! Two classifiers are provided: the deterministic [`KeywordClassifier`]
//! (lexical cue sets, the default) and [`LlmClassifier`], which delegates
//! the decision to a [`TextGenerator`](cinequery_core::TextGenerator) and
//! falls back to routing both ways when the model is unavailable.
//!
//! ## Example
//!
//! ```rust,ignore
//! let orchestrator = Orchestrator::builder()
//!     .classifier(Arc::new(KeywordClassifier::new()?))
//!     .structured(Arc::new(structured_backend))
//!     .semantic(Arc::new(semantic_backend))
//!     .build()?;
//!
//! let merged = orchestrator.handle(&query, &history).await?;
//! ```

pub mod classify;
pub mod config;
pub mod keyword;
pub mod llm;
pub mod merge;
pub mod orchestrator;

pub use classify::Classifier;
pub use config::{RouterConfig, RouterConfigBuilder};
pub use keyword::KeywordClassifier;
pub use llm::LlmClassifier;
pub use merge::{MergePolicy, merge_dual, merge_single, normalize_title};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
