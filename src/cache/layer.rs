// Cache layer over the config store.
// Refreshes, lists, clears, and searches cached log group metadata.

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::aws::LogGroupSource;
use crate::config::ConfigStore;
use crate::error::{PcliError, Result};

use super::entry::{CACHE_KEY, CacheEntry, EntrySummary};

/// Outcome of refreshing every cache entry.
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<(CacheEntry, PcliError)>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.total
    }
}

/// Cached data stored under the `cache` key of a [`ConfigStore`].
pub struct CacheLayer<S> {
    config: ConfigStore,
    source: S,
}

impl<S: LogGroupSource> CacheLayer<S> {
    pub fn new(config: ConfigStore, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn into_config(self) -> ConfigStore {
        self.config
    }

    /// Replace the cached log groups with a fresh listing and persist it.
    ///
    /// On failure the previously cached value is left as it was.
    pub fn refresh(&mut self) -> Result<()> {
        self.refresh_entry(CacheEntry::LogGroups)
    }

    /// Refresh a single entry. The stored value is overwritten, never merged.
    pub fn refresh_entry(&mut self, entry: CacheEntry) -> Result<()> {
        let value = match entry {
            CacheEntry::LogGroups => {
                let names = self.source.list_log_groups()?;
                info!(count = names.len(), "refreshed log groups");
                Value::Array(names.into_iter().map(Value::String).collect())
            }
        };
        self.store_entry(entry, value)
    }

    /// Refresh every entry in [`CacheEntry::ALL`], continuing past failures.
    pub fn refresh_all(&mut self) -> RefreshReport {
        let mut report = RefreshReport {
            total: CacheEntry::ALL.len(),
            ..RefreshReport::default()
        };

        for &entry in CacheEntry::ALL {
            match self.refresh_entry(entry) {
                Ok(()) => report.succeeded += 1,
                Err(err) => {
                    warn!(entry = entry.key(), error = %err, "cache refresh failed");
                    report.failures.push((entry, err));
                }
            }
        }

        report
    }

    /// Write one entry into the config file, keeping whatever else is on disk.
    fn store_entry(&mut self, entry: CacheEntry, value: Value) -> Result<()> {
        self.config.update(&entry.config_path(), value)
    }

    /// Cached log group names, in stored order. Non-string items are skipped.
    pub fn cached_log_groups(&self) -> Vec<String> {
        match self.config.get(&CacheEntry::LogGroups.config_path()) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Log groups containing `partial`, case-insensitively.
    ///
    /// An empty cache is populated with one refresh first. Refresh failures
    /// produce an empty result instead of an error.
    pub fn lookup(&mut self, partial: &str) -> Vec<String> {
        let mut names = self.cached_log_groups();
        if names.is_empty() {
            debug!("log group cache empty, refreshing");
            if let Err(err) = self.refresh() {
                warn!(error = %err, "could not populate log group cache");
                return Vec::new();
            }
            names = self.cached_log_groups();
        }

        let needle = partial.to_lowercase();
        names
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Remove the entire `cache` subtree from the config file.
    pub fn clear(&mut self) -> Result<()> {
        self.config.delete(CACHE_KEY)
    }

    /// Summaries of every stored cache entry, in stored order.
    pub fn list(&self) -> Vec<EntrySummary> {
        match self.config.get(CACHE_KEY) {
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(key, value)| EntrySummary::from_value(key.as_str(), value))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Raw stored value of one entry, e.g. `log_groups`.
    pub fn get_entry(&self, key: &str) -> Option<Value> {
        self.config.get(&format!("{}.{}", CACHE_KEY, key))
    }
}
