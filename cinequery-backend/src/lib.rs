//! # cinequery-backend
//!
//! Backend adapters for CineQuery.
//!
//! ## Overview
//!
//! Every backend sits behind the same capability: [`BackendAdapter`], an
//! async `invoke(request) -> response` that never returns `Err` past its
//! boundary. Failures, timeouts, and empty result sets all come back as
//! [`AdapterResponse`](cinequery_core::AdapterResponse) data, so the
//! orchestrator can degrade instead of unwinding.
//!
//! Two adapter families are provided:
//!
//! - [`StructuredHttpBackend`] / [`SemanticHttpBackend`] — reqwest clients
//!   for the relational query service and the plot-summary retrieval
//!   service.
//! - [`InMemoryStructuredBackend`] / [`InMemorySemanticBackend`] —
//!   catalog-seeded fakes for development, offline runs, and tests, with
//!   injectable failure and latency.

pub mod adapter;
pub mod error;
pub mod inmemory;
pub mod semantic;
pub mod structured;

pub use adapter::BackendAdapter;
pub use error::BackendError;
pub use inmemory::{InMemorySemanticBackend, InMemoryStructuredBackend};
pub use semantic::SemanticHttpBackend;
pub use structured::StructuredHttpBackend;
