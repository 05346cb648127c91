// Config store bound to a single file on disk.
// Handles format-generic loading, dotted-path access, and atomic persistence.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{PcliError, Result};

use super::format::{ConfigFormat, Document};
use super::paths::temp_path_for;

/// A structured config document bound to its file and format.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    format: ConfigFormat,
    document: Document,
}

impl ConfigStore {
    /// Bind a store to `path` without touching the filesystem.
    pub fn bind(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ConfigFormat::from_path(&path)?;
        Ok(Self {
            path,
            format,
            document: Document::empty(format),
        })
    }

    /// Bind to `path` and load it. Fails with `ConfigNotFound` if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut store = Self::bind(path)?;
        store.load()?;
        Ok(store)
    }

    /// Open `path`, writing `defaults` to disk first if the file does not exist.
    ///
    /// Returns the store and whether it was freshly created.
    pub fn open_or_create(
        path: impl Into<PathBuf>,
        defaults: &Map<String, Value>,
    ) -> Result<(Self, bool)> {
        let mut store = Self::bind(path)?;
        match store.load() {
            Ok(()) => Ok((store, false)),
            Err(err) if err.is_not_found() => {
                for (key, value) in defaults {
                    store.document.set(key, value.clone());
                }
                store.persist()?;
                Ok((store, true))
            }
            Err(err) => Err(err),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// The in-memory document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Re-read the bound file, replacing the in-memory document.
    pub fn load(&mut self) -> Result<()> {
        self.document = read_document(&self.path, self.format)?;
        debug!(path = %self.path.display(), keys = self.document.len(), "loaded config");
        Ok(())
    }

    /// Read a dotted key path such as `cache.log_groups`.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.document.get(path)
    }

    /// Read a dotted key path as a string.
    pub fn get_str(&self, path: &str) -> Option<String> {
        match self.get(path)? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// Set a value at a dotted key path in memory, creating intermediate mappings.
    ///
    /// Any non-mapping value found along the way is replaced by a mapping.
    pub fn set(&mut self, path: &str, value: Value) {
        self.document.set(path, value);
    }

    /// Remove a value at a dotted key path in memory, returning it.
    pub fn remove(&mut self, path: &str) -> Option<Value> {
        self.document.remove(path)
    }

    /// Set a dotted key path in the file itself and persist it.
    ///
    /// The file is re-read first so changes made on disk since loading are kept.
    /// A missing file starts from the in-memory document. On error the in-memory
    /// document is left as it was.
    pub fn update(&mut self, path: &str, value: Value) -> Result<()> {
        let mut document = match read_document(&self.path, self.format) {
            Ok(document) => document,
            Err(err) if err.is_not_found() => self.document.clone(),
            Err(err) => return Err(err),
        };
        document.set(path, value);

        write_atomic(&self.path, &document.encode()?)?;
        debug!(key = path, path = %self.path.display(), "updated config key");

        self.document = document;
        Ok(())
    }

    /// Remove a top-level key from the file and persist the rest untouched.
    ///
    /// The file is re-read first so changes made on disk since loading are kept.
    /// Deleting an absent key is a no-op. The in-memory document reflects the
    /// file afterwards.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let mut document = read_document(&self.path, self.format)?;
        if !document.remove_key(key) {
            debug!(key, "config key already absent");
            self.document = document;
            return Ok(());
        }

        write_atomic(&self.path, &document.encode()?)?;
        debug!(key, path = %self.path.display(), "deleted config key");

        self.load()
    }

    /// Write the in-memory document to disk in its original format.
    pub fn persist(&self) -> Result<()> {
        let contents = self.document.encode()?;
        write_atomic(&self.path, &contents)?;
        debug!(path = %self.path.display(), format = self.format.name(), "persisted config");
        Ok(())
    }
}

fn read_document(path: &Path, format: ConfigFormat) -> Result<Document> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(PcliError::ConfigNotFound(path.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    };
    format.decode(path, &contents)
}

/// Replace `path` with `contents` via a synced temp file and rename.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigStore::open(temp_dir.path().join("missing.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_open_or_create_writes_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join(".pcli.json");

        let mut defaults = Map::new();
        defaults.insert("version".to_string(), json!("v0.1.0"));

        let (store, created) = ConfigStore::open_or_create(&path, &defaults).unwrap();
        assert!(created);
        assert_eq!(store.get_str("version").as_deref(), Some("v0.1.0"));

        let (reopened, created) = ConfigStore::open_or_create(&path, &Map::new()).unwrap();
        assert!(!created);
        assert_eq!(reopened.document().to_json(), Value::Object(defaults));
    }

    #[test]
    fn test_parse_error_surfaces() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "bad.yaml", "cache: [unclosed\n");
        let err = ConfigStore::open(&path).unwrap_err();
        assert!(matches!(err, PcliError::ConfigParse { .. }));
    }

    #[test]
    fn test_get_dotted_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            "c.json",
            r#"{"aws": {"profile": "dev"}, "cache": {"log_groups": ["a"]}}"#,
        );
        let store = ConfigStore::open(&path).unwrap();

        assert_eq!(store.get_str("aws.profile").as_deref(), Some("dev"));
        assert_eq!(store.get("cache.log_groups"), Some(json!(["a"])));
        assert_eq!(store.get("cache.missing"), None);
        assert_eq!(store.get("aws.profile.deeper"), None);
        assert_eq!(store.get(""), None);
    }

    #[test]
    fn test_set_creates_and_replaces_parents() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConfigStore::bind(temp_dir.path().join("c.json")).unwrap();

        store.set("cache.log_groups", json!(["a", "b"]));
        assert_eq!(store.get("cache.log_groups"), Some(json!(["a", "b"])));

        store.set("version", json!("v1"));
        store.set("version.major", json!(1));
        assert_eq!(store.get("version"), Some(json!({"major": 1})));
    }

    #[test]
    fn test_remove_nested() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ConfigStore::bind(temp_dir.path().join("c.json")).unwrap();
        store.set("cache.log_groups", json!(["a"]));

        assert_eq!(store.remove("cache.log_groups"), Some(json!(["a"])));
        assert_eq!(store.remove("cache.log_groups"), None);
        assert_eq!(store.get("cache"), Some(json!({})));
    }

    #[test]
    fn test_persist_and_reload_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yml");

        let mut store = ConfigStore::bind(&path).unwrap();
        store.set("version", json!("v0.1.0"));
        store.set("cache.log_groups", json!(["/aws/lambda/api"]));
        store.persist().unwrap();

        assert!(!temp_path_for(&path).exists());
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("log_groups:"));

        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(reloaded.document(), store.document());
    }

    #[test]
    fn test_delete_preserves_other_keys_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            ".pcli.json",
            r#"{
  "version": "v0.1.0",
  "cache": {"log_groups": ["a", "b"]},
  "custom": {"nested": [1, 2, {"deep": true}], "note": null}
}"#,
        );
        let mut store = ConfigStore::open(&path).unwrap();
        store.delete("cache").unwrap();

        assert_eq!(store.get("cache"), None);
        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(
            reloaded.document().to_json(),
            json!({
                "version": "v0.1.0",
                "custom": {"nested": [1, 2, {"deep": true}], "note": null}
            })
        );
    }

    #[test]
    fn test_delete_preserves_other_keys_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            "config.yaml",
            "version: v0.1.0\ncache:\n  log_groups:\n  - a\nteam:\n  owners:\n  - dev@example.com\n  size: 4\n",
        );
        let mut store = ConfigStore::open(&path).unwrap();
        store.delete("cache").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("log_groups"));
        assert!(!contents.trim_start().starts_with('{'));

        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(
            reloaded.document().to_json(),
            json!({"version": "v0.1.0", "team": {"owners": ["dev@example.com"], "size": 4}})
        );
    }

    #[test]
    fn test_delete_twice_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "c.json", r#"{"cache": {"x": "y"}, "keep": 1}"#);
        let mut store = ConfigStore::open(&path).unwrap();

        store.delete("cache").unwrap();
        let after_first = fs::read_to_string(&path).unwrap();
        store.delete("cache").unwrap();
        let after_second = fs::read_to_string(&path).unwrap();

        assert_eq!(after_first, after_second);
        assert_eq!(store.get("keep"), Some(json!(1)));
    }

    #[test]
    fn test_delete_sees_external_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "c.json", r#"{"cache": {}}"#);
        let mut store = ConfigStore::open(&path).unwrap();

        fs::write(&path, r#"{"cache": {}, "added": "elsewhere"}"#).unwrap();
        store.delete("cache").unwrap();

        assert_eq!(store.get_str("added").as_deref(), Some("elsewhere"));
    }

    #[test]
    fn test_update_sees_external_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "c.json", r#"{"version": "v0.1.0"}"#);
        let mut store = ConfigStore::open(&path).unwrap();

        fs::write(&path, r#"{"version": "v0.1.0", "added": "elsewhere"}"#).unwrap();
        store.update("cache.log_groups", json!(["a"])).unwrap();

        let reloaded = ConfigStore::open(&path).unwrap();
        assert_eq!(
            reloaded.document().to_json(),
            json!({"version": "v0.1.0", "added": "elsewhere", "cache": {"log_groups": ["a"]}})
        );
        assert_eq!(store.document(), reloaded.document());
    }

    #[test]
    fn test_update_failure_leaves_memory_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("c.json");
        fs::create_dir(&path).unwrap();
        let mut store = ConfigStore::bind(&path).unwrap();
        store.set("cache.log_groups", json!(["kept"]));

        assert!(store.update("cache.log_groups", json!(["new"])).is_err());
        assert_eq!(store.get("cache.log_groups"), Some(json!(["kept"])));
    }

    #[test]
    fn test_delete_keeps_big_json_numbers() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(
            &temp_dir,
            "c.json",
            r#"{"cache":{}, "account":123456789012345678901234567890, "ratio": 0.5}"#,
        );
        let mut store = ConfigStore::open(&path).unwrap();
        store.delete("cache").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("123456789012345678901234567890"));
        assert!(!contents.contains("cache"));
    }

    #[test]
    fn test_delete_keeps_yaml_special_floats() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "c.yaml", "cache: {}\ntimeout: .inf\n");
        let mut store = ConfigStore::open(&path).unwrap();
        store.delete("cache").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "timeout: .inf\n");
    }

    #[test]
    fn test_delete_keeps_yaml_integer_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_file(&temp_dir, "c.yaml", "cache: {}\nports: {8080: web}\n");
        let mut store = ConfigStore::open(&path).unwrap();
        store.delete("cache").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("8080: web"));
        assert!(!contents.contains("'8080'"));
        assert_eq!(store.get("ports.8080"), Some(json!("web")));
    }
}
