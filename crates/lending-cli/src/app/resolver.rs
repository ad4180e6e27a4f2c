//! Path resolution for config and store files.

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_store_path, LendingConfig};

/// Resolve the config file path, checking LENDING_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("LENDING_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the store path: `--store` / LENDING_STORE, then the config file,
/// then the XDG data directory.
pub fn resolve_store_path(cli: &Cli, config: Option<&LendingConfig>) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_deref().filter(|p| !p.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(config) = config {
        return Ok(PathBuf::from(&config.store.path));
    }
    default_store_path()
}

/// Error message when the store file is missing.
pub fn missing_store_message(path: &Path) -> String {
    format!(
        "No lending store found at {}\n\nRun:\n  lending init\n\nOr specify a store path:\n  LENDING_STORE=/path/to/lending.db lending init",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_flag_wins_over_config() {
        let cli = Cli::try_parse_from(["lending", "--store", "/tmp/flag.db", "check"]).unwrap();
        let config = LendingConfig::new(Path::new("/tmp/config.db"));
        assert_eq!(
            resolve_store_path(&cli, Some(&config)).unwrap(),
            PathBuf::from("/tmp/flag.db")
        );
    }

    #[test]
    fn test_config_used_without_flag() {
        let cli = Cli::try_parse_from(["lending", "check"]).unwrap();
        if cli.store.is_some() {
            // LENDING_STORE is set in the environment running the tests.
            return;
        }
        let config = LendingConfig::new(Path::new("/tmp/config.db"));
        assert_eq!(
            resolve_store_path(&cli, Some(&config)).unwrap(),
            PathBuf::from("/tmp/config.db")
        );
    }

    #[test]
    fn test_missing_store_message_names_path() {
        let message = missing_store_message(Path::new("/nowhere/lending.db"));
        assert!(message.contains("/nowhere/lending.db"));
        assert!(message.contains("lending init"));
    }
}
