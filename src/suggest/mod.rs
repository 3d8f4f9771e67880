pub mod prompt;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Model;

pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 300;
pub const FREQUENCY_PENALTY: f64 = 0.0;

#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("OpenAI API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OpenAI API response contained no message content")]
    EmptyResponse,
}

/// A chat-completion backend that turns one prompt into one reply.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, OpenAiError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
    frequency_penalty: f64,
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
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for the OpenAI chat completions endpoint.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
    model: Model,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &SecretString, model: Model) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: SecretString::from(api_key.expose_secret().to_string()),
            model,
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    /// Send the prompt as a single user message and return the content of
    /// the first choice. Sampling parameters are fixed.
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_bytes = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String, OpenAiError> {
        let request = ChatRequest {
            model: self.model.as_str(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            frequency_penalty: FREQUENCY_PENALTY,
        };

        debug!("requesting chat completion");
        let response: ChatResponse = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(choices = response.choices.len(), "received chat completion");

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(OpenAiError::EmptyResponse)
    }
}
