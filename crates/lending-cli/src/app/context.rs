//! Application context for the Lending CLI.
//!
//! Provides a unified context that combines CLI arguments with the
//! lazily-loaded config file.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use lending_core::{LendingEngine, LendingError, SqliteStore};

use crate::cli::Cli;
use crate::config::{read_config, LendingConfig};
use crate::errors::CliError;
use crate::ui::UiContext;

use super::resolver::{missing_store_message, resolve_config_path, resolve_store_path};

/// Application context that bundles CLI args with the config file.
///
/// This avoids repeatedly loading config and threading multiple parameters
/// through handler functions.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<LendingConfig>>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The config file, if one exists. Loaded on first use.
    pub fn config(&self) -> anyhow::Result<Option<&LendingConfig>> {
        let config = self.config.get_or_try_init(|| {
            let path = resolve_config_path()?;
            if !path.exists() {
                return Ok::<_, anyhow::Error>(None);
            }
            Ok(Some(read_config(&path)?))
        })?;
        Ok(config.as_ref())
    }

    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        resolve_store_path(self.cli, self.config()?)
    }

    /// UI context for this invocation's global flags.
    pub fn ui_context(&self) -> UiContext {
        UiContext::from_env(self.cli.json, self.cli.no_color, self.cli.ascii)
    }

    /// Open the store and build an engine with the configured policy.
    pub fn open_engine(&self) -> anyhow::Result<LendingEngine<SqliteStore>> {
        let path = self.store_path()?;
        let store = SqliteStore::open(&path).map_err(|err| match err {
            LendingError::StoreNotFound(_) => anyhow::Error::new(CliError::not_found(
                missing_store_message(&path),
                "Run `lending init` to create a store.",
            )),
            other => anyhow::Error::new(other),
        })?;

        let policy = match self.config()? {
            Some(config) => config.policy()?,
            None => Default::default(),
        };
        tracing::debug!(store = %path.display(), "opened lending store");
        Ok(LendingEngine::new(store).with_policy(policy))
    }
}
