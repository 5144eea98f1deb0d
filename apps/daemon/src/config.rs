//! Daemon configuration loaded from TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration filename inside the config directory.
pub const CONFIG_FILE: &str = "deepspace.toml";

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:3210";

/// Resolve the global configuration directory (`~/.deepspace/`).
pub fn global_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".deepspace")
}

/// Top-level daemon configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Model identifier.
    pub model: String,
    /// API key (supports `${ENV_VAR}` expansion).
    pub api_key: String,
    /// Base URL override for the completion endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Listen address.
    #[serde(default = "default_addr")]
    pub addr: String,
    /// System prompt override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

fn default_addr() -> String {
    DEFAULT_ADDR.to_owned()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            model: "qwen-plus".into(),
            api_key: "${DASHSCOPE_API_KEY}".into(),
            base_url: None,
            addr: default_addr(),
            system_prompt: None,
        }
    }
}

impl DaemonConfig {
    /// Parse a TOML string, expanding environment variables in supported
    /// fields.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = crate::utils::expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }
}

/// Write a default configuration file on first run.
pub fn scaffold(config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;

    let path = config_dir.join(CONFIG_FILE);
    let contents = toml::to_string_pretty(&DaemonConfig::default())
        .context("failed to serialize default config")?;
    std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))
}
