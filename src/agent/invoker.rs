use super::api::{ChatMessage, GenerationClient, GenerationRequest, OpenAiClient};
use super::models::ModelSelector;
use super::offline::offline_response;
use super::prompt::{system_prompt, user_prompt};
use super::response::extract;
use super::{Role, RoleResponse};
use crate::config::{GenerationConfig, ModelConfig};
use crate::error::Result;
use std::sync::Arc;
use tracing::{debug, info};

/// Runs one role against the generation client and extracts its artifact.
#[derive(Clone)]
pub struct RoleInvoker {
    client: Option<Arc<dyn GenerationClient>>,
    models: ModelSelector,
}

impl RoleInvoker {
    /// `None` for `client` puts every role in offline mode
    pub fn new(client: Option<Arc<dyn GenerationClient>>, models: ModelConfig) -> Self {
        Self {
            client,
            models: ModelSelector::new(models),
        }
    }

    pub fn offline(models: ModelConfig) -> Self {
        Self::new(None, models)
    }

    pub fn from_config(generation: &GenerationConfig, models: ModelConfig) -> Result<Self> {
        let client = OpenAiClient::from_config(generation)?
            .map(|client| Arc::new(client) as Arc<dyn GenerationClient>);

        if client.is_none() {
            info!("No API key configured, agents will answer with offline responses");
        }

        Ok(Self::new(client, models))
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    /// Build the request that `invoke` would send for `role` and `task`
    pub fn build_request(&self, role: Role, task: &str) -> GenerationRequest {
        let model = self.models.select_for_role(role).to_string();
        let temperature = self.models.temperature_for(&model);

        GenerationRequest {
            model,
            messages: vec![
                ChatMessage::system(system_prompt(role)),
                ChatMessage::user(user_prompt(task)),
            ],
            temperature,
        }
    }

    /// Ask `role` to perform `task`.
    ///
    /// Generation errors propagate as-is; there is no retry at this level.
    pub async fn invoke(&self, role: Role, task: &str) -> Result<RoleResponse> {
        let Some(client) = &self.client else {
            debug!("Offline response for {}", role);
            return Ok(offline_response(role));
        };

        let request = self.build_request(role, task);
        debug!("Invoking {} on {}", role, request.model);

        let text = client.generate(request).await?;
        let response = extract(&text);

        debug!(
            "{} answered with {} chars, artifact: {}",
            role,
            response.message.len(),
            response.artifact.is_some()
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::MockGenerationClient;
    use crate::error::Error;
    use serde_json::json;

    fn invoker_with(mock: &MockGenerationClient, models: ModelConfig) -> RoleInvoker {
        let client: Arc<dyn GenerationClient> = Arc::new(mock.clone());
        RoleInvoker::new(Some(client), models)
    }

    #[tokio::test]
    async fn test_offline_mode_returns_canned_response() {
        let invoker = RoleInvoker::offline(ModelConfig::default());
        assert!(invoker.is_offline());

        let response = invoker.invoke(Role::Purchasing, "anything").await.unwrap();
        assert_eq!(response, offline_response(Role::Purchasing));
    }

    #[tokio::test]
    async fn test_invoke_extracts_artifact() {
        let mock = MockGenerationClient::new();
        mock.add_success_response("Buy these.\n```json\n{\"purchaseOrder\": []}\n```")
            .await;
        let invoker = invoker_with(&mock, ModelConfig::default());

        let response = invoker.invoke(Role::Purchasing, "ZIP: 10001").await.unwrap();
        assert_eq!(response.message, "Buy these.");
        assert_eq!(response.artifact, Some(json!({"purchaseOrder": []})));

        let requests = mock.get_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gpt-5-mini");
        assert_eq!(requests[0].messages[0].role, "system");
        assert!(requests[0].messages[0].content.contains("Purchasing Agent"));
        assert!(requests[0].messages[1].content.starts_with("ZIP: 10001"));
        assert!(requests[0].messages[1]
            .content
            .contains("exactly ONE JSON code block"));
    }

    #[tokio::test]
    async fn test_temperature_follows_model() {
        let mock = MockGenerationClient::new();
        let models = ModelConfig {
            planner: "gpt-4o".to_string(),
            ..Default::default()
        };
        let invoker = invoker_with(&mock, models);

        assert_eq!(
            invoker.build_request(Role::Planner, "x").temperature,
            Some(0.7)
        );
        assert_eq!(invoker.build_request(Role::Analyzer, "x").temperature, None);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_without_retry() {
        let mock = MockGenerationClient::new();
        mock.add_response(Err(Error::RateLimited)).await;
        mock.add_success_response("never used").await;
        let invoker = invoker_with(&mock, ModelConfig::default());

        let result = invoker.invoke(Role::Planner, "plan").await;
        assert!(matches!(result, Err(Error::RateLimited)));
        assert_eq!(mock.call_count().await, 1);
    }
}
