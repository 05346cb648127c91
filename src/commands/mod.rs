// Command handlers for the pcli binary.
// Shared global options and config bootstrap for every subcommand.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pcli::config::{self, ConfigStore};
use tracing::debug;

pub mod cache;
pub mod logs;

pub use cache::CacheCommand;
pub use logs::LogsCommand;

/// Flags shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

/// Resolve and open the config file, creating a default one when missing.
pub fn load_config(options: &GlobalOptions) -> Result<ConfigStore> {
    let path = config::resolve_config_path(options.config.as_deref())?;
    let (store, created) = ConfigStore::open_or_create(&path, &config::default_values())
        .with_context(|| format!("failed to load config {}", path.display()))?;

    if created && !options.quiet {
        println!("Config file not found, created default configuration at {}", path.display());
    } else {
        debug!(path = %store.path().display(), "using config file");
    }
    Ok(store)
}
