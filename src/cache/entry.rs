// Cache entry kinds and display summaries.
// Names the entries stored under the reserved `cache` config key.

use serde_json::Value;

use crate::config::value_kind;

/// Top-level config key reserved for cached data.
pub const CACHE_KEY: &str = "cache";

/// A named cache entry that can be refreshed from an external source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntry {
    LogGroups,
}

impl CacheEntry {
    /// Every refreshable entry, in refresh order.
    pub const ALL: &'static [CacheEntry] = &[CacheEntry::LogGroups];

    pub fn key(&self) -> &'static str {
        match self {
            CacheEntry::LogGroups => "log_groups",
        }
    }

    /// Dotted config path, e.g. `cache.log_groups`.
    pub fn config_path(&self) -> String {
        format!("{}.{}", CACHE_KEY, self.key())
    }
}

/// Coarse description of one stored cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub key: String,
    pub kind: &'static str,
    /// Character count for strings, item count for sequences and mappings.
    pub size: Option<usize>,
}

impl EntrySummary {
    pub fn from_value(key: impl Into<String>, value: &Value) -> Self {
        let size = match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        };
        Self {
            key: key.into(),
            kind: value_kind(value),
            size,
        }
    }

    pub fn size_label(&self) -> String {
        match (self.kind, self.size) {
            ("string", Some(n)) => format!("{} chars", n),
            (_, Some(n)) => format!("{} items", n),
            _ => "N/A".to_string(),
        }
    }
}
