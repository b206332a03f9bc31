//! The uniform backend adapter capability.

use std::future::Future;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, warn};

use cinequery_core::{AdapterRequest, AdapterResponse, BackendKind, ResultItem};

use crate::error::BackendError;

/// A backend wrapped behind the common request/response contract.
///
/// `invoke` must not fail past its boundary: any internal error is captured
/// and returned as `status = Error` with empty items and a detail string,
/// and `request.timeout` is honored (expiry reports detail `"timeout"`).
/// Invocations are idempotent from the orchestrator's perspective and
/// order-stable within a call: structured adapters return rows in the
/// requested sort order, semantic adapters in descending similarity.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Which backend this adapter fronts.
    fn kind(&self) -> BackendKind;

    /// A short adapter name for logs.
    fn name(&self) -> &str;

    /// Execute the request and return the uniform response.
    async fn invoke(&self, request: &AdapterRequest) -> AdapterResponse;
}

/// Run one fallible fetch under the request timeout and flatten the outcome
/// into an [`AdapterResponse`].
///
/// Shared by every adapter implementation so the containment contract lives
/// in one place.
pub(crate) async fn run_guarded<F>(
    backend: BackendKind,
    name: &str,
    request: &AdapterRequest,
    fetch: F,
) -> AdapterResponse
where
    F: Future<Output = Result<Vec<ResultItem>, BackendError>> + Send,
{
    let started = Instant::now();
    match tokio::time::timeout(request.timeout, fetch).await {
        Ok(Ok(items)) => {
            let latency = started.elapsed();
            debug!(adapter = name, backend = %backend, items = items.len(), ?latency, "backend ok");
            AdapterResponse::ok(backend, items, latency)
        }
        Ok(Err(err)) => {
            let latency = started.elapsed();
            warn!(adapter = name, backend = %backend, error = %err, "backend error");
            AdapterResponse::error(backend, err.to_string(), latency)
        }
        Err(_) => {
            let latency = started.elapsed();
            warn!(adapter = name, backend = %backend, ?latency, "backend timed out");
            AdapterResponse::error(backend, "timeout", latency)
        }
    }
}
