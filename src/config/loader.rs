use super::{Config, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Resolves the effective configuration: TOML file first, environment on top.
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// `path` is the explicit `--config` argument, if any
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub async fn load(&self) -> Result<Config> {
        let mut config = self.load_file().await?;
        config.merge_env_vars()?;
        Ok(config)
    }

    /// Load only the file layer, without environment overrides
    pub async fn load_file(&self) -> Result<Config> {
        match &self.path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::read(path).await
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::read(default_path).await
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Config::new())
                }
            }
        }
    }

    async fn read(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
