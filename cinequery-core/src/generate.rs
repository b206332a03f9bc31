//! Text-generation trait: the boundary to the external language model.

use async_trait::async_trait;

use crate::error::Result;

/// A single text-generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// The full prompt, including any grounding context the caller assembled.
    pub prompt: String,
    /// Sampling temperature; `None` uses the provider default.
    pub temperature: Option<f32>,
    /// Upper bound on generated tokens; `None` uses the provider default.
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Create a request with provider-default sampling settings.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), temperature: None, max_output_tokens: None }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token cap.
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = Some(max);
        self
    }
}

/// The external text-generation collaborator.
///
/// Treated as a black box that may be slow or fail: every caller in the
/// routing core has a deterministic fallback for a `Generation` error, so a
/// broken model degrades answers instead of breaking the pipeline.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// A short provider/model name for logs and error messages.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Generation`](crate::CineError::Generation) when
    /// the provider call fails.
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;
}
