//! Agent roles and the LLM plumbing behind them
//!
//! Each role is a fixed persona with a static system instruction. A
//! [`RoleInvoker`] turns a role plus a task into a [`RoleResponse`], either
//! by calling the configured [`GenerationClient`] or, when no API key is
//! set, by returning the role's canned offline answer.

pub mod api;
pub mod invoker;
pub mod mock;
pub mod models;
pub mod offline;
pub mod prompt;
pub mod response;

pub use api::{ChatMessage, GenerationClient, GenerationRequest, OpenAiClient};
pub use invoker::RoleInvoker;
pub use mock::MockGenerationClient;
pub use models::{supports_temperature, ModelSelector};
pub use offline::offline_response;
pub use response::{extract, parse_artifact, ArtifactError, RoleResponse};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name of the coordinator persona on delegation messages
pub const MANAGER: &str = "Manager";

/// Display name of the human on the other end of the socket
pub const USER: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Drafts the plan, shopping list and outline timeline
    Planner,
    Purchasing,
    Delivery,
    Analyzer,
    /// Writes the time-coded script for a live cook session
    Executor,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Planner,
        Role::Purchasing,
        Role::Delivery,
        Role::Analyzer,
        Role::Executor,
    ];

    /// Name shown to the user as message author
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Planner | Role::Executor => "Chef",
            Role::Purchasing => "Purchasing",
            Role::Delivery => "Delivery",
            Role::Analyzer => "Analyzer",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Role::Planner => "planner",
            Role::Purchasing => "purchasing",
            Role::Delivery => "delivery",
            Role::Analyzer => "analyzer",
            Role::Executor => "executor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names() {
        assert_eq!(Role::Planner.display_name(), "Chef");
        assert_eq!(Role::Executor.display_name(), "Chef");
        assert_eq!(Role::Delivery.to_string(), "delivery");
        assert_eq!(
            serde_json::to_string(&Role::Analyzer).unwrap(),
            "\"analyzer\""
        );
    }
}
