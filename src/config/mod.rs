use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod loader;

pub use loader::ConfigLoader;

/// Default OpenAI-compatible chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "cookos.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub server: ServerConfig,
    pub generation: GenerationConfig,
    pub models: ModelConfig,
    pub sessions: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 4605,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Blank or missing keys switch the agents to their offline responses
    pub api_key: Option<String>,
    pub endpoint: String,
    pub request_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl GenerationConfig {
    /// The API key, if one is set and not blank
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Model identifier per agent role.
///
/// Planning and analysis get the stronger model, execution and logistics
/// the faster one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub planner: String,
    pub purchasing: String,
    pub delivery: String,
    pub analyzer: String,
    pub executor: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            planner: "gpt-5.2".to_string(),
            purchasing: "gpt-5-mini".to_string(),
            delivery: "gpt-5-mini".to_string(),
            analyzer: "gpt-5.2".to_string(),
            executor: "gpt-5-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Cook sessions untouched for this long are evicted
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 2 * 60 * 60,
            sweep_interval_secs: 5 * 60,
        }
    }
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_with(|name| std::env::var(name).ok())
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// A port variable that is not a valid `u16` is a configuration error.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("OPENAI_API_KEY") {
            self.generation.api_key = Some(api_key);
        }

        if let Some(endpoint) = lookup("COOKOS_ENDPOINT") {
            self.generation.endpoint = endpoint;
        }

        if let Some(log_level) = lookup("COOKOS_LOG_LEVEL") {
            self.log_level = Some(log_level);
        }

        // COOKOS_PORT wins over the generic PORT
        for name in ["PORT", "COOKOS_PORT"] {
            if let Some(port) = lookup(name) {
                self.server.port = port
                    .parse::<u16>()
                    .map_err(|_| Error::Config(format!("Invalid {name} value: {port:?}")))?;
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Copy safe to print, with the API key masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.generation.credential().is_some() {
            copy.generation.api_key = Some("***".to_string());
        }
        copy
    }
}
