// pcli: developer CLI for CloudWatch log groups.
// Caches log group listings in the user's config file and tails logs via the aws program.

pub mod aws;
pub mod cache;
pub mod config;
pub mod error;
pub mod logs;

pub use error::{PcliError, Result};
