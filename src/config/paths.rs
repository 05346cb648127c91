// Config path utilities.
// Resolves where the pcli config file lives on disk.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{PcliError, Result};

/// File name of the default config, placed directly in the home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".pcli.json";

/// Get the user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Path to the default config file (~/.pcli.json).
pub fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
}

/// Resolve the config path, preferring an explicit override.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path().ok_or(PcliError::ConfigNotBound),
    }
}

/// Sibling path used for atomic writes of `path`.
///
/// The full file name is kept so `config.json` and `config.yaml` never share a temp file.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_explicit_path() {
        let path = resolve_config_path(Some(Path::new("/etc/pcli/config.yaml"))).unwrap();
        assert_eq!(path, PathBuf::from("/etc/pcli/config.yaml"));
    }

    #[test]
    fn test_default_config_path() {
        // Only verifies path construction; CI runners always have a home directory.
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".pcli.json"));
        }
    }

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/home/dev/.pcli.json")),
            PathBuf::from("/home/dev/.pcli.json.tmp")
        );
        assert_eq!(
            temp_path_for(Path::new("config.yaml")),
            PathBuf::from("config.yaml.tmp")
        );
    }
}
