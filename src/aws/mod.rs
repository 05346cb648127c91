// AWS CLI module.
// Abstracts the external `aws` program behind traits so callers can swap in fakes.

pub mod client;
pub mod types;

pub use client::{AwsCli, PROGRAM_ENV};
pub use types::{DescribeLogGroupsResponse, LogGroup};

use crate::error::Result;

/// Source of log group names, normally the `aws logs describe-log-groups` listing.
///
/// Implementations make no retries; a failure is reported as-is.
pub trait LogGroupSource {
    fn list_log_groups(&self) -> Result<Vec<String>>;
}

/// Runs a long-lived `aws` invocation with its output streamed to the terminal.
pub trait TailProcess {
    /// Run with `args` after the program name, blocking until the process exits.
    fn stream(&self, args: &[String]) -> Result<()>;
}

impl<T: LogGroupSource + ?Sized> LogGroupSource for &T {
    fn list_log_groups(&self) -> Result<Vec<String>> {
        (**self).list_log_groups()
    }
}

impl<T: TailProcess + ?Sized> TailProcess for &T {
    fn stream(&self, args: &[String]) -> Result<()> {
        (**self).stream(args)
    }
}
