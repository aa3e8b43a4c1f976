use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

#[derive(Error, Debug)]
pub enum GroqError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can take one user message and hand back the raw completion body.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// `content` is whatever the caller sent; `None` leaves the field out of the upstream request.
    async fn complete(&self, content: Option<Value>) -> Result<Value, GroqError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompletionMessage {
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionRequest {
    pub fn single_user_message(model: &str, content: Option<Value>) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![CompletionMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

/// Pulls `choices[0].message.content` out of a raw completion body.
pub fn extract_reply(body: &Value) -> Option<String> {
    let parsed: CompletionResponse = serde_json::from_value(body.clone()).ok()?;
    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_BASE_URL.to_string(), DEFAULT_MODEL.to_string())
    }

    pub fn with_endpoint(api_key: String, base_url: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CompletionApi for GroqClient {
    async fn complete(&self, content: Option<Value>) -> Result<Value, GroqError> {
        let request = CompletionRequest::single_user_message(&self.model, content);

        tracing::debug!(model = %self.model, "Groq API request: {} message(s)", request.messages.len());

        // Single attempt; the body is parsed whatever the status so error payloads reach the caller.
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        tracing::debug!("Groq API response (status {}): {}", status, response_text);

        if !status.is_success() {
            tracing::warn!("Groq API returned {}", status);
        }

        Ok(serde_json::from_str(&response_text)?)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
