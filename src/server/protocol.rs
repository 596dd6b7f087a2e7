//! Wire protocol for the `/ws` event channel
//!
//! Every frame is a JSON envelope `{"event": "<name>", "data": <payload>}`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events sent by the browser
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "job:start")]
    JobStart(JobStart),
    #[serde(rename = "cook:start")]
    CookStart(CookStart),
    #[serde(rename = "cook:next")]
    CookNext(CookNext),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JobStart(_) => "job:start",
            ClientEvent::CookStart(_) => "cook:start",
            ClientEvent::CookNext(_) => "cook:next",
        }
    }
}

/// Parse one inbound text frame
pub fn parse_client_event(text: &str) -> Result<ClientEvent> {
    serde_json::from_str(text).map_err(|e| Error::InvalidEvent(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobStart {
    pub prompt: String,
    pub location_key: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CookStart {
    pub job_id: Option<String>,
    pub prompt: String,
    pub location_key: String,
    /// Plan artifact from an earlier `job:final`, if the client kept one
    pub plan: Option<Value>,
    pub personality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookNext {
    pub session_id: String,
}

/// Events sent to the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "job:status")]
    Status(JobStatus),
    #[serde(rename = "agent:message")]
    AgentMessage(AgentMessage),
    #[serde(rename = "job:final")]
    JobFinal(JobFinal),
    #[serde(rename = "cook:ready")]
    CookReady(CookReady),
    #[serde(rename = "job:error")]
    Error(ErrorPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Idle,
    Running,
    Planning,
    Purchasing,
    Delivery,
    Analyzing,
    Done,
    Cooking,
    CookingLive,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Delegation,
    Message,
    Analysis,
    Control,
    Execution,
    Step,
    Status,
    Error,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMessage {
    pub from_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_agent: Option<String>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Value>,
    /// Milliseconds since the Unix epoch
    pub ts: i64,
}

impl AgentMessage {
    pub fn new(from_agent: &str, kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            from_agent: from_agent.to_string(),
            to_agent: None,
            kind,
            content: content.into(),
            artifact: None,
            ts: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to(mut self, agent: &str) -> Self {
        self.to_agent = Some(agent.to_string());
        self
    }

    pub fn with_artifact(mut self, artifact: Option<Value>) -> Self {
        self.artifact = artifact;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFinal {
    pub job_id: String,
    pub prompt: String,
    pub location_key: String,
    pub chef: Option<Value>,
    pub purchasing: Option<Value>,
    pub delivery: Option<Value>,
    /// Analyzer artifact, or its prose when it produced none
    pub analyzer: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookReady {
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}
