//! # cinequery-model
//!
//! Text-generation providers for CineQuery.
//!
//! Implements the [`TextGenerator`](cinequery_core::TextGenerator) contract
//! against OpenAI-compatible chat-completion APIs (OpenAI itself, plus
//! self-hosted servers exposing the same wire shape). For tests and offline
//! runs, use [`MockGenerator`](cinequery_core::MockGenerator) from the core
//! crate instead.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cinequery_model::OpenAiGenerator;
//!
//! let generator = OpenAiGenerator::from_env()?;            // OPENAI_API_KEY
//! let local = OpenAiGenerator::compatible("key", "http://localhost:11434/v1", "llama3")?;
//! ```

pub mod openai;

pub use openai::OpenAiGenerator;
