use crate::models::{ChatRequest, ChatResponse};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Client side of `POST /api/chat`.
#[async_trait]
pub trait RelayClient: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError>;
}

#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// `server_url` is the relay's origin, e.g. `http://localhost:3000`.
    pub fn new(server_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/chat", server_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, RelayError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Error statuses still carry a JSON body worth reading.
        if !status.is_success() {
            tracing::warn!("Relay answered {}: {}", status, body);
        }

        Ok(serde_json::from_str(&body)?)
    }
}
