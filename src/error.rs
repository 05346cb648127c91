// Error types for pcli.
// Covers config file loading/persisting and failures of the external aws program.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcliError {
    #[error("No config file bound: could not resolve a config path")]
    ConfigNotBound,

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Failed to parse config {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to run {command}: {message}")]
    ExternalCommand { command: String, message: String },

    #[error("Malformed output from external command: {0}")]
    Decode(String),
}

impl PcliError {
    /// Whether the error came from the external data source rather than local state.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            PcliError::ExternalCommand { .. } | PcliError::Decode(_)
        )
    }

    /// Whether the config file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PcliError::ConfigNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, PcliError>;
