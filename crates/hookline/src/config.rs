use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub hooks: HooksConfig,

    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HooksConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Overrides the global root kept in state
    #[serde(default)]
    pub global_root: Option<String>,

    /// Reported to scripts as `clineVersion`
    #[serde(default)]
    pub client_version: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StateConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_timeout() -> u64 {
    30
}

fn default_db_path() -> String {
    "./hookline.db".to_string()
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            global_root: None,
            client_version: None,
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl HooksConfig {
    /// Global root with `~` and environment variables expanded
    pub fn global_root(&self) -> Result<Option<PathBuf>> {
        self.global_root
            .as_deref()
            .map(|raw| {
                shellexpand::full(raw)
                    .map(|p| PathBuf::from(p.as_ref()))
                    .context(format!("Failed to expand global_root: {}", raw))
            })
            .transpose()
    }
}

/// Load config from file or use defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        let content =
            fs::read_to_string(path).context(format!("Failed to read config file: {:?}", path))?;

        let config: Config = toml::from_str(&content).context("Failed to parse TOML config")?;

        Ok(config)
    } else {
        Ok(Config::default())
    }
}
