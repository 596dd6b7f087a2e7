//! Structured artifact extraction from free-text model answers
//!
//! Models are asked to put machine-readable output in a single ```` ```json ````
//! fence. [`extract`] splits an answer into the prose a person reads and the
//! parsed payload. A missing or malformed fence degrades to "no artifact";
//! it never fails the call.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// First fenced json block, capturing its body
static FIRST_JSON_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("Valid regex pattern"));

/// Every fenced json block. A block that opens a line also takes the line
/// break after its closing fence; one that starts mid-line leaves it.
static ANY_JSON_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?ims)^```json.*?```[ \t]*(?:\r?\n)?|```json.*?```[ \t]*")
        .expect("Valid regex pattern")
});

/// One agent's answer after extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleResponse {
    /// Prose with every json fence removed
    pub message: String,
    pub artifact: Option<Value>,
}

impl RoleResponse {
    pub fn new(message: impl Into<String>, artifact: Option<Value>) -> Self {
        Self {
            message: message.into(),
            artifact,
        }
    }

    /// The artifact, or `{}` when absent, for embedding in a follow-up prompt
    pub fn artifact_or_empty(&self) -> Value {
        self.artifact
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default()))
    }
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no json block in response")]
    Missing,

    #[error("json block could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse the first fenced json block of `text`.
pub fn parse_artifact(text: &str) -> Result<Value, ArtifactError> {
    let captures = FIRST_JSON_BLOCK
        .captures(text)
        .ok_or(ArtifactError::Missing)?;
    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    Ok(serde_json::from_str(body)?)
}

/// Remove all fenced json blocks from `text` and trim the rest.
pub fn strip_artifacts(text: &str) -> String {
    ANY_JSON_BLOCK.replace_all(text, "").trim().to_string()
}

/// Split a model answer into prose and artifact.
pub fn extract(text: &str) -> RoleResponse {
    let artifact = match parse_artifact(text) {
        Ok(value) => Some(value),
        Err(ArtifactError::Missing) => None,
        Err(e) => {
            tracing::debug!("Discarding artifact: {}", e);
            None
        }
    };

    RoleResponse {
        message: strip_artifacts(text),
        artifact,
    }
}
