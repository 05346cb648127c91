// Log tailing over the external aws program.
// Translates a tail request into `aws logs tail` arguments and runs it with live output.

use std::time::Duration;

use tracing::debug;

use crate::aws::TailProcess;
use crate::error::Result;

use super::since::format_since;

/// What to tail and how far back to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailRequest {
    pub log_group: String,
    pub follow: bool,
    /// Ignored while following.
    pub since: Duration,
}

impl TailRequest {
    pub fn new(log_group: impl Into<String>) -> Self {
        Self {
            log_group: log_group.into(),
            follow: false,
            since: Duration::ZERO,
        }
    }

    pub fn follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    pub fn since(mut self, since: Duration) -> Self {
        self.since = since;
        self
    }

    /// Arguments for the external program, after the program name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "logs".to_string(),
            "tail".to_string(),
            self.log_group.clone(),
        ];

        if self.follow {
            args.push("--follow".to_string());
            if !self.since.is_zero() {
                debug!(since = ?self.since, "ignoring --since while following");
            }
        } else if let Some(since) = format_since(self.since) {
            args.push("--since".to_string());
            args.push(since);
        }

        args
    }
}

/// Streams log output for a log group through a [`TailProcess`].
pub struct LogStreamer<P> {
    process: P,
}

impl<P: TailProcess> LogStreamer<P> {
    pub fn new(process: P) -> Self {
        Self { process }
    }

    /// Tail `request.log_group`, blocking until the external process exits.
    pub fn tail(&self, request: &TailRequest) -> Result<()> {
        self.process.stream(&request.to_args())
    }
}
