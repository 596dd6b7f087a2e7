//! System instructions and task prompts for each agent role

use super::Role;
use serde_json::Value;

/// Appended to every task so the answer carries at most one artifact fence
pub const ARTIFACT_DIRECTIVE: &str = "If you include an artifact, put it in exactly ONE JSON code block like:\n\n```json\n{ \"ok\": true }\n```\n";

pub fn system_prompt(role: Role) -> &'static str {
    match role {
        Role::Planner | Role::Executor => {
            "You are the Chef Agent. You output human-readable guidance AND a structured JSON artifact in ```json``` fences when asked."
        }
        Role::Purchasing => {
            "You are the Purchasing Agent. Return vendor suggestions and a purchase order. Provide substitutes."
        }
        Role::Delivery => {
            "You are the Delivery Agent. Return a delivery plan with stops, ETA, and handling notes (cold-chain)."
        }
        Role::Analyzer => {
            "You are the Analyzer Agent. Enforce convergence: decide, lock, and output a copy-paste build prompt. No hedging."
        }
    }
}

/// Task text plus the artifact directive
pub fn user_prompt(task: &str) -> String {
    format!("{}\n\n{}", task, ARTIFACT_DIRECTIVE)
}

fn pretty(artifact: &Value) -> String {
    serde_json::to_string_pretty(artifact).unwrap_or_else(|_| "{}".to_string())
}

pub fn plan_task(prompt: &str, location_key: &str) -> String {
    format!(
        "Dish: {prompt}\nZIP: {location_key}\nReturn a clear plan + shopping list + timeline.\nInclude JSON artifact in ```json``` fences."
    )
}

pub fn purchasing_task(location_key: &str, chef_artifact: &Value) -> String {
    format!(
        "ZIP: {}\nChef Artifact:\n{}\nReturn JSON artifact with purchaseOrder + vendorSuggestions.",
        location_key,
        pretty(chef_artifact)
    )
}

pub fn delivery_task(location_key: &str, purchase_artifact: &Value) -> String {
    format!(
        "ZIP: {}\nPurchase Artifact:\n{}\nReturn JSON artifact with deliveryPlan.",
        location_key,
        pretty(purchase_artifact)
    )
}

pub fn analyzer_task(chef: &Value, purchasing: &Value, delivery: &Value) -> String {
    format!(
        "You are the principal architect. No hedging.\n\
Output MUST include:\n\
1) Positives\n\
2) Negatives (concrete)\n\
3) Fixes REQUIRED before next run\n\
4) A single copy-paste BUILD PROMPT for the next version. Make irreversible decisions.\n\
\n\
Chef Artifact:\n{}\n\
\n\
Purchasing Artifact:\n{}\n\
\n\
Delivery Artifact:\n{}\n",
        pretty(chef),
        pretty(purchasing),
        pretty(delivery)
    )
}
