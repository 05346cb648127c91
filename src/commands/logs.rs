// `pcli logs` subcommands.
// Tails log groups and serves cached log group names to shell completion.

use std::ffi::OsStr;
use std::process::ExitCode;
use std::time::Duration;

use clap::Subcommand;
use clap_complete::engine::{ArgValueCompleter, CompletionCandidate};
use pcli::aws::AwsCli;
use pcli::cache::CacheLayer;
use pcli::logs::{LogStreamer, TailRequest, parse_since};
use tracing::warn;

use super::{GlobalOptions, load_config};

#[derive(Subcommand, Debug)]
pub enum LogsCommand {
    /// Stream logs from a log group (like tail -f).
    Tail {
        /// Log group name, e.g. /aws/lambda/orders-api.
        #[arg(add = ArgValueCompleter::new(complete_log_group))]
        log_group: String,

        /// Stream logs in real time.
        #[arg(short, long)]
        follow: bool,

        /// How far back to fetch logs (e.g. 10m, 1h, 1h30m, 2d). Ignored with --follow.
        #[arg(short, long, value_parser = parse_since, default_value = "0")]
        since: Duration,
    },

    /// Print cached log group names matching a partial name, one per line.
    #[command(hide = true)]
    Complete {
        #[arg(default_value = "")]
        partial: String,
    },
}

pub fn run(cmd: LogsCommand, options: &GlobalOptions) -> ExitCode {
    match cmd {
        LogsCommand::Tail {
            log_group,
            follow,
            since,
        } => tail(TailRequest::new(log_group).follow(follow).since(since), options),
        LogsCommand::Complete { partial } => {
            for name in complete(&partial, options) {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
    }
}

/// Tail failures end the process with a non-zero status.
fn tail(request: TailRequest, options: &GlobalOptions) -> ExitCode {
    let client = match load_config(options) {
        Ok(config) => AwsCli::from_config(&config),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "continuing without config");
            AwsCli::from_env()
        }
    };

    let result = client.and_then(|client| LogStreamer::new(client).tail(&request));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Shell completion for the log group argument, from the default config file.
fn complete_log_group(current: &OsStr) -> Vec<CompletionCandidate> {
    log_group_candidates(current, &GlobalOptions::default())
}

fn log_group_candidates(current: &OsStr, options: &GlobalOptions) -> Vec<CompletionCandidate> {
    let Some(partial) = current.to_str() else {
        return Vec::new();
    };
    complete(partial, options)
        .into_iter()
        .map(CompletionCandidate::new)
        .collect()
}

/// Completion candidates; any failure yields none.
fn complete(partial: &str, options: &GlobalOptions) -> Vec<String> {
    let quiet = GlobalOptions {
        quiet: true,
        ..options.clone()
    };
    let config = match load_config(&quiet) {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "completion unavailable");
            return Vec::new();
        }
    };
    let source = match AwsCli::from_config(&config) {
        Ok(source) => source,
        Err(err) => {
            warn!(error = %err, "completion unavailable");
            return Vec::new();
        }
    };

    CacheLayer::new(config, source).lookup(partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options_for(dir: &TempDir, contents: &str) -> GlobalOptions {
        let path = dir.path().join("c.json");
        fs::write(&path, contents).unwrap();
        GlobalOptions {
            config: Some(path),
            quiet: false,
        }
    }

    #[test]
    fn test_log_group_candidates_from_cache() {
        let temp_dir = TempDir::new().unwrap();
        let options = options_for(
            &temp_dir,
            r#"{"cache": {"log_groups": ["/ecs/svc-api", "/ecs/billing", "/aws/lambda/SVC-cron"]}}"#,
        );

        let candidates: Vec<String> = log_group_candidates(OsStr::new("svc"), &options)
            .iter()
            .map(|candidate| candidate.get_value().to_string_lossy().into_owned())
            .collect();
        assert_eq!(candidates, vec!["/ecs/svc-api", "/aws/lambda/SVC-cron"]);
    }

    #[test]
    fn test_complete_on_missing_config_stays_silent() {
        let temp_dir = TempDir::new().unwrap();
        let options = GlobalOptions {
            config: Some(temp_dir.path().join("c.toml")),
            quiet: false,
        };

        assert!(complete("svc", &options).is_empty());
    }
}
