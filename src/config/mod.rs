// Config module for the on-disk pcli settings file.
// Provides path resolution, JSON/YAML format handling, and the ConfigStore.

pub mod format;
pub mod paths;
pub mod store;

pub use format::{ConfigFormat, Document, value_kind};
pub use paths::{DEFAULT_CONFIG_FILE, default_config_path, resolve_config_path};
pub use store::ConfigStore;

use serde_json::{Map, Value, json};

/// Version stamped into freshly created config files.
pub const DEFAULT_CONFIG_VERSION: &str = "v0.1.0";

/// Top-level keys written when no config file exists yet.
pub fn default_values() -> Map<String, Value> {
    let mut values = Map::new();
    values.insert("version".to_string(), json!(DEFAULT_CONFIG_VERSION));
    values
}
