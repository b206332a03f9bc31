//! OpenAI-compatible chat-completion generator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use cinequery_core::{CineError, GenerateRequest, Result, TextGenerator};

/// The default API base for OpenAI.
const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The default chat model.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// A [`TextGenerator`] backed by an OpenAI-compatible chat-completions API.
///
/// Uses `reqwest` to call `{base}/chat/completions` directly, so any server
/// speaking the same wire shape (vLLM, Ollama, LM Studio) works via
/// [`compatible`](OpenAiGenerator::compatible).
#[derive(Debug)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create a generator with the given API key and default model.
    ///
    /// # Errors
    ///
    /// Returns [`CineError::Config`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CineError::Config("API key must not be empty".to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: OPENAI_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Create a generator from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            CineError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::new(api_key)
    }

    /// Create a generator for an OpenAI-compatible server.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let mut generator = Self::new(api_key)?;
        generator.base_url = base_url.into();
        generator.model = model.into();
        Ok(generator)
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── TextGenerator implementation ───────────────────────────────────

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<String> {
        debug!(model = %self.model, prompt_len = request.prompt.len(), "chat completion");

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(model = %self.model, error = %e, "request failed");
                CineError::Generation {
                    provider: self.model.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(model = %self.model, %status, "API error");
            return Err(CineError::Generation {
                provider: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse response");
            CineError::Generation {
                provider: self.model.clone(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CineError::Generation {
                provider: self.model.clone(),
                message: "API returned no choices".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_a_config_error() {
        let err = OpenAiGenerator::new("").unwrap_err();
        assert!(matches!(err, CineError::Config(_)));
    }

    #[test]
    fn compatible_overrides_base_and_model() {
        let generator =
            OpenAiGenerator::compatible("key", "http://localhost:11434/v1", "llama3").unwrap();
        assert_eq!(generator.name(), "llama3");
        assert_eq!(generator.base_url, "http://localhost:11434/v1");
    }
}
