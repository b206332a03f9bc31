//! # cinequery-chat
//!
//! Response composition and the per-turn chat engine for CineQuery.
//!
//! The [`Composer`] turns a merged result set into the final
//! natural-language [`Answer`](cinequery_core::Answer): it assembles a
//! content digest, delegates phrasing to the configured
//! [`TextGenerator`](cinequery_core::TextGenerator), and falls back to a
//! deterministic templated listing when the model fails — an answer always
//! comes back, never an error.
//!
//! The [`ChatEngine`] is the combined entry point a chat UI calls once per
//! user turn: build the query, route it through the
//! [`Orchestrator`](cinequery_router::Orchestrator), compose the answer,
//! and append the completed turn to the conversation state.

pub mod composer;
pub mod engine;

pub use composer::{Composer, ComposerConfig, INSUFFICIENT_ANSWER};
pub use engine::ChatEngine;
