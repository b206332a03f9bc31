//! Internal error type for backend adapter implementations.

use thiserror::Error;

/// What went wrong inside one adapter invocation.
///
/// Never crosses the adapter boundary as an `Err`: the invocation guard
/// flattens it into `AdapterResponse { status: Error, detail }`.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or the connection dropped.
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("service returned {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error detail from the service body, when decodable.
        detail: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}
