use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lending_core::LendingPolicy;

use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize)]
pub struct LendingConfig {
    pub store: StoreSection,
    /// Overrides for the default lending policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<LendingPolicy>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSection {
    pub path: String,
}

impl LendingConfig {
    pub fn new(store_path: &Path) -> Self {
        Self {
            store: StoreSection {
                path: store_path.to_string_lossy().to_string(),
            },
            policy: None,
        }
    }

    /// Effective policy: the configured table, or the default one.
    pub fn policy(&self) -> anyhow::Result<LendingPolicy> {
        let policy = self.policy.clone().unwrap_or_default();
        policy
            .validate()
            .map_err(|e| CliError::invalid_input(format!("Invalid [policy] in config: {}", e)))?;
        Ok(policy)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("lending.db"))
}

pub fn read_config(path: &Path) -> anyhow::Result<LendingConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &LendingConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("lending"));
        }
    }
    Ok(home_dir()?.join(".config").join("lending"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("lending"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("lending"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
