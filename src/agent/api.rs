//! Generation client for OpenAI-compatible chat completion endpoints

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One chat message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request; serialises directly as the request body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Text generation collaborator.
///
/// Failures (transport, credentials, quota) are returned as errors and are
/// never retried here; callers that know what they need decide on retries.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

/// Chat completions client using bearer authentication
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, endpoint: String, config: &GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    /// Build a client from config; `None` when no credential is configured
    pub fn from_config(config: &GenerationConfig) -> Result<Option<Self>> {
        match config.credential() {
            Some(key) => Self::new(key.to_string(), config.endpoint.clone(), config).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        debug!(
            "Requesting completion from {} ({} messages)",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::MalformedResponse(e.to_string()))?;

                Ok(body
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .map(|content| content.trim().to_string())
                    .unwrap_or_default())
            }
            StatusCode::TOO_MANY_REQUESTS => Err(Error::RateLimited),
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Upstream {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}

// Internal API response structures
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
