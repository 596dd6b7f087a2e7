//! Live cook mode: acquiring a time-coded script from the executor agent
//!
//! The executor is asked for a minute-by-minute timeline. If the first answer
//! has no usable `timeline` array, one stricter request follows. Whatever the
//! second answer contains is final, even if it is still empty.

pub mod timeline;

pub use timeline::{has_timeline, steps_from_response, TimelineStep};

use crate::agent::{Role, RoleInvoker, RoleResponse};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const DEFAULT_PERSONALITY: &str = "calm_comedic";

/// What the user wants to cook and how the chef should sound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookRequest {
    pub prompt: String,
    pub location_key: String,
    pub personality: String,
}

impl CookRequest {
    pub fn new(
        prompt: impl Into<String>,
        location_key: impl Into<String>,
        personality: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            location_key: location_key.into(),
            personality: personality.into(),
        }
    }
}

const TIMELINE_SCHEMA: &str = r#"{"timeline":[{"t_start_sec":0,"t_end_sec":90,"instruction":"...","critical":true,"voiceCue":true}]}"#;

pub fn timeline_task(request: &CookRequest) -> String {
    format!(
        "Create a minute-by-minute execution script for cooking \"{}\".\n\
Beginner friendly, confidence-building.\n\
Output MUST include a JSON artifact in ```json``` fences with:\n\
{}\n\
Rules:\n\
- First 5 minutes must be extremely explicit.\n\
- Include recovery notes in instruction when critical.\n\
ZIP: {}\n\
Personality: {}\n",
        request.prompt, TIMELINE_SCHEMA, request.location_key, request.personality
    )
}

pub fn strict_timeline_task(request: &CookRequest) -> String {
    format!(
        "RETRY (STRICT). Return ONLY ONE JSON code block with schema:\n\
```json\n{}\n```\n\
No extra text outside the JSON fence.\n\
\n\
Dish: {}\n\
ZIP: {}\n\
Personality: {}\n",
        TIMELINE_SCHEMA, request.prompt, request.location_key, request.personality
    )
}

/// Ask the executor for a timeline, retrying once with a stricter prompt.
///
/// Makes at most two generation calls. Generation errors propagate.
pub async fn acquire_timeline(invoker: &RoleInvoker, request: &CookRequest) -> Result<RoleResponse> {
    let first = invoker
        .invoke(Role::Executor, &timeline_task(request))
        .await?;
    if has_timeline(&first) {
        return Ok(first);
    }

    warn!(
        "Executor returned no timeline for \"{}\", retrying with strict prompt",
        request.prompt
    );

    let retry = invoker
        .invoke(Role::Executor, &strict_timeline_task(request))
        .await?;
    if !has_timeline(&retry) {
        info!("Strict retry also returned no timeline");
    }

    Ok(retry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{GenerationClient, MockGenerationClient};
    use crate::config::ModelConfig;
    use crate::error::Error;
    use serde_json::json;
    use std::sync::Arc;

    const GOOD: &str = "Let's go.\n```json\n{\"timeline\":[{\"t_start_sec\":0,\"t_end_sec\":60,\"instruction\":\"Boil\"}]}\n```";
    const EMPTY: &str = "Sure!\n```json\n{\"timeline\":[]}\n```";

    fn request() -> CookRequest {
        CookRequest::new("pasta", "94110", DEFAULT_PERSONALITY)
    }

    fn invoker(mock: &MockGenerationClient) -> RoleInvoker {
        let client: Arc<dyn GenerationClient> = Arc::new(mock.clone());
        RoleInvoker::new(Some(client), ModelConfig::default())
    }

    #[tokio::test]
    async fn test_first_attempt_accepted() {
        let mock = MockGenerationClient::new();
        mock.add_success_response(GOOD).await;

        let response = acquire_timeline(&invoker(&mock), &request()).await.unwrap();
        assert!(has_timeline(&response));
        assert_eq!(mock.call_count().await, 1);
    }

    #[tokio::test]
    async fn test_empty_timeline_triggers_one_strict_retry() {
        let mock = MockGenerationClient::new();
        mock.add_success_response(EMPTY).await;
        mock.add_success_response(GOOD).await;

        let response = acquire_timeline(&invoker(&mock), &request()).await.unwrap();
        assert_eq!(steps_from_response(&response).len(), 1);

        let requests = mock.get_requests().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[0].messages[1]
            .content
            .contains("minute-by-minute execution script"));
        assert!(requests[1].messages[1].content.starts_with("RETRY (STRICT)"));
        assert!(requests[1].messages[1].content.contains("Dish: pasta"));
    }

    #[tokio::test]
    async fn test_retry_result_is_final_even_when_empty() {
        let mock = MockGenerationClient::new();
        mock.add_success_response(EMPTY).await;
        mock.add_success_response(EMPTY).await;
        mock.add_success_response(GOOD).await;

        let response = acquire_timeline(&invoker(&mock), &request()).await.unwrap();
        assert_eq!(response.artifact, Some(json!({"timeline": []})));
        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_unusable_steps_trigger_retry() {
        let mock = MockGenerationClient::new();
        mock.add_success_response("```json\n{\"timeline\":[{\"t\":\"00:00\",\"step\":\"Start\"}]}\n```")
            .await;
        mock.add_success_response(GOOD).await;

        let response = acquire_timeline(&invoker(&mock), &request()).await.unwrap();
        assert_eq!(mock.call_count().await, 2);
        let steps = steps_from_response(&response);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].instruction, "Boil");
    }

    #[tokio::test]
    async fn test_missing_fence_triggers_retry() {
        let mock = MockGenerationClient::new();
        mock.add_success_response("Step one: boil water. Step two: add pasta.")
            .await;
        mock.add_success_response("no fence again").await;

        let response = acquire_timeline(&invoker(&mock), &request()).await.unwrap();
        assert!(response.artifact.is_none());
        assert_eq!(mock.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_propagates() {
        let mock = MockGenerationClient::new();
        mock.add_success_response(EMPTY).await;
        mock.add_response(Err(Error::Unauthorized)).await;

        let result = acquire_timeline(&invoker(&mock), &request()).await;
        assert!(matches!(result, Err(Error::Unauthorized)));
    }

    #[tokio::test]
    async fn test_offline_executor_needs_no_retry() {
        let invoker = RoleInvoker::offline(ModelConfig::default());
        let response = acquire_timeline(&invoker, &request()).await.unwrap();
        assert_eq!(steps_from_response(&response).len(), 3);
    }

    #[test]
    fn test_prompts_embed_request() {
        let task = timeline_task(&request());
        assert!(task.contains("\"pasta\""));
        assert!(task.contains("First 5 minutes must be extremely explicit"));
        assert!(task.contains("Personality: calm_comedic"));

        let strict = strict_timeline_task(&request());
        assert!(strict.contains("No extra text outside the JSON fence"));
        assert!(strict.contains("ZIP: 94110"));
    }
}
