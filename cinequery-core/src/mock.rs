//! Mock text generator for tests and offline runs.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CineError, Result};
use crate::generate::{GenerateRequest, TextGenerator};

/// A scriptable [`TextGenerator`] for tests and offline use.
///
/// Records every prompt it receives, replies with a fixed string (or fails,
/// or stalls), and never touches the network.
///
/// # Example
///
/// ```rust,ignore
/// let generator = MockGenerator::replying("The most rented film is Bucket Brotherhood.");
/// let reply = generator.generate(&GenerateRequest::new("...")).await?;
/// assert_eq!(generator.prompts().len(), 1);
/// ```
pub struct MockGenerator {
    reply: Option<String>,
    failure: Option<String>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    /// A generator that always returns `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()), failure: None, delay: None, prompts: Mutex::new(Vec::new()) }
    }

    /// A generator that always fails with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { reply: None, failure: Some(message.into()), delay: None, prompts: Mutex::new(Vec::new()) }
    }

    /// A generator that reports unavailability on every call.
    ///
    /// Useful for offline runs: the composer and classifier fall back to
    /// their deterministic paths, so the pipeline still answers.
    pub fn unavailable() -> Self {
        Self::failing("generator unavailable")
    }

    /// Sleep for `delay` before replying or failing. Lets tests exercise
    /// timeout paths under a paused tokio clock.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("mock prompt lock poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        self.prompts.lock().expect("mock prompt lock poisoned").push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = &self.failure {
            return Err(CineError::Generation {
                provider: "mock".to_string(),
                message: message.clone(),
            });
        }

        Ok(self.reply.clone().unwrap_or_default())
    }
}
