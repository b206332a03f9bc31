//! # cinequery-core
//!
//! Shared data model and contracts for the CineQuery movie-catalog Q&A engine.
//!
//! ## Overview
//!
//! CineQuery answers natural-language questions about a movie catalog by
//! routing each query to one or both of two backends: a structured relational
//! store (rental statistics, title metadata) and a semantic retrieval store
//! (plot summaries, thematic content). This crate holds the types that flow
//! between the routing stages:
//!
//! - [`Query`] — one immutable user question.
//! - [`Route`] / [`ClassificationResult`] — the intent classifier's decision.
//! - [`AdapterRequest`] / [`AdapterResponse`] — the uniform backend contract.
//! - [`ResultItem`] / [`MergedResult`] — backend-tagged records and the
//!   merged, possibly degraded, result set.
//! - [`Answer`] — the final composed reply.
//! - [`TextGenerator`] — the boundary to the external language model that
//!   phrases answers (and optionally routes queries).
//!
//! The classifier, orchestrator, composer, and adapters live in the
//! `cinequery-router`, `cinequery-chat`, and `cinequery-backend` crates.

pub mod error;
pub mod generate;
pub mod mock;
pub mod query;
pub mod result;
pub mod route;

pub use error::{CineError, Result};
pub use generate::{GenerateRequest, TextGenerator};
pub use mock::MockGenerator;
pub use query::Query;
pub use result::{
    AdapterRequest, AdapterResponse, Answer, CompositeRecord, MergedResult, ResponseStatus,
    ResultItem, SemanticRecord, StructuredRecord,
};
pub use route::{BackendKind, ClassificationResult, Route};
