// Cache module for data kept in the pcli config file.
// Stores log group listings under the `cache` key for display and autocompletion.

pub mod entry;
pub mod layer;

pub use entry::{CACHE_KEY, CacheEntry, EntrySummary};
pub use layer::{CacheLayer, RefreshReport};
