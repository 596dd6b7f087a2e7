//! Canned role responses used when no API key is configured

use super::{Role, RoleResponse};
use serde_json::json;

/// Deterministic stand-in answer for `role`
pub fn offline_response(role: Role) -> RoleResponse {
    match role {
        Role::Planner => RoleResponse::new(
            "Offline Chef: Plan drafted. (Set OPENAI_API_KEY to use a real model.)",
            Some(json!({
                "plan": ["Prep", "Cook", "Plate"],
                "shoppingList": [{ "item": "example ingredient", "qty": 1 }],
                "timeline": [{ "t": "00:00", "step": "Start" }]
            })),
        ),
        Role::Purchasing => RoleResponse::new(
            "Offline Purchasing: Purchase order generated.",
            Some(json!({
                "purchaseOrder": [{ "item": "example ingredient", "qty": 1 }]
            })),
        ),
        Role::Delivery => RoleResponse::new(
            "Offline Delivery: Delivery plan generated.",
            Some(json!({
                "deliveryPlan": [{ "stop": 1, "action": "Pick up items", "eta": "30m" }]
            })),
        ),
        Role::Analyzer => {
            RoleResponse::new("Offline Analyzer: Convergence notes generated.", None)
        }
        Role::Executor => RoleResponse::new(
            "Offline Chef: Alright, let's cook. I'll walk you through it one step at a time.",
            Some(json!({
                "timeline": [
                    {
                        "t_start_sec": 0,
                        "t_end_sec": 90,
                        "instruction": "Wash your hands, clear the counter and set out every ingredient before any heat goes on.",
                        "critical": false,
                        "voiceCue": true
                    },
                    {
                        "t_start_sec": 90,
                        "t_end_sec": 300,
                        "instruction": "Heat the pan on medium for two minutes. If it starts smoking, lift it off the burner for 30 seconds and turn the heat down.",
                        "critical": true,
                        "voiceCue": true
                    },
                    {
                        "t_start_sec": 300,
                        "t_end_sec": 600,
                        "instruction": "Cook the main ingredient, stirring every minute. Taste, adjust the salt, then plate.",
                        "critical": false,
                        "voiceCue": true
                    }
                ]
            })),
        ),
    }
}
