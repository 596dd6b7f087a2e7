//! Model selection per agent role

use super::Role;
use crate::config::ModelConfig;

/// Temperature sent to models that accept one
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Whether `model` accepts a custom temperature.
///
/// The gpt-4 family does; newer reasoning models reject the parameter.
pub fn supports_temperature(model: &str) -> bool {
    model.starts_with("gpt-4")
}

/// Routes each role to its configured model
#[derive(Debug, Clone)]
pub struct ModelSelector {
    config: ModelConfig,
}

impl ModelSelector {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn select_for_role(&self, role: Role) -> &str {
        match role {
            Role::Planner => &self.config.planner,
            Role::Purchasing => &self.config.purchasing,
            Role::Delivery => &self.config.delivery,
            Role::Analyzer => &self.config.analyzer,
            Role::Executor => &self.config.executor,
        }
    }

    pub fn temperature_for(&self, model: &str) -> Option<f32> {
        supports_temperature(model).then_some(DEFAULT_TEMPERATURE)
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::new(ModelConfig::default())
    }
}
