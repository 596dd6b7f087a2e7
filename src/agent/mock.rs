//! Scripted generation client for tests

use super::api::{GenerationClient, GenerationRequest};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock implementation of `GenerationClient` for testing
#[derive(Clone, Default)]
pub struct MockGenerationClient {
    /// Responses handed out in order, one per `generate` call
    pub responses: Arc<Mutex<VecDeque<Result<String>>>>,
    /// Every request received, for verification
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockGenerationClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for the next call
    pub async fn add_response(&self, response: Result<String>) {
        self.responses.lock().await.push_back(response);
    }

    pub async fn add_success_response(&self, text: &str) {
        self.add_response(Ok(text.to_string())).await;
    }

    pub async fn add_error_response(&self, status: u16, body: &str) {
        self.add_response(Err(Error::Upstream {
            status,
            body: body.to_string(),
        }))
        .await;
    }

    pub async fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().await.push(request);

        self.responses.lock().await.pop_front().unwrap_or_else(|| {
            Err(Error::Upstream {
                status: 500,
                body: "No mock response configured".to_string(),
            })
        })
    }
}
