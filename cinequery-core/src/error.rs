//! Error types for the CineQuery crates.
//!
//! Backend adapter failures are deliberately absent from this enum: the
//! adapter contract converts them to [`AdapterResponse`](crate::AdapterResponse)
//! data (`status = Error` plus a detail string) instead of propagating them,
//! so the only error a caller of the routing core ever sees is an invalid
//! query rejected before any backend work.

use thiserror::Error;

/// Errors that can occur in the CineQuery routing core.
#[derive(Debug, Error)]
pub enum CineError {
    /// The incoming query was empty or otherwise malformed.
    ///
    /// Surfaced to the caller before any backend is invoked.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Text generation failed.
    ///
    /// Recovered locally by the composer (templated fallback) and the
    /// classifier (route-to-both fallback); never reaches the end user.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The text-generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A session store operation failed.
    #[error("Session error: {0}")]
    Session(String),
}

/// A convenience result type for CineQuery operations.
pub type Result<T> = std::result::Result<T, CineError>;
