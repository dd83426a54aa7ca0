//! `RoastGenerator` over an OpenAI-compatible chat completions endpoint.

use async_trait::async_trait;
use roastduel_core::error::DuelError;
use roastduel_core::ports::RoastGenerator;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::status::{error_from_response, map_send_error};

/// Default API base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model.
pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat completions client.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Creates a generator for `model` at `base_url`.
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let model = model.into();
        info!(%model, %base_url, "generation client initialized");
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url,
            model,
        }
    }
}

#[async_trait]
impl RoastGenerator for OpenAiGenerator {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, DuelError> {
        let operation = "generator.complete";
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| map_send_error(operation, &err))?;
        if !response.status().is_success() {
            return Err(error_from_response(operation, response).await);
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|err| DuelError::MalformedResponse(format!("{operation}: {err}")))?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                DuelError::MalformedResponse("completion has no message content".into())
            })?;
        debug!(chars = content.chars().count(), "completion received");
        Ok(content)
    }
}
