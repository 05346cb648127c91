// AWS CLI subprocess wrapper.
// Builds `aws` invocations, captures structured output, and streams tail sessions.

use std::env;
use std::process::{Command, Output, Stdio};

use tracing::{debug, info};

use crate::config::ConfigStore;
use crate::error::{PcliError, Result};

use super::types::DescribeLogGroupsResponse;
use super::{LogGroupSource, TailProcess};

const DEFAULT_PROGRAM: &str = "aws";

/// Environment variable overriding the aws command line.
pub const PROGRAM_ENV: &str = "PCLI_AWS_CLI";

/// Handle for invoking the AWS CLI as a child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCli {
    program: String,
    leading_args: Vec<String>,
    profile: Option<String>,
    region: Option<String>,
}

impl Default for AwsCli {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            leading_args: Vec::new(),
            profile: None,
            region: None,
        }
    }
}

impl AwsCli {
    /// Create a client from a command line such as `aws` or `aws-vault exec dev -- aws`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let invalid = |message: String| PcliError::ExternalCommand {
            command: command_line.to_string(),
            message,
        };

        let mut words = shell_words::split(command_line)
            .map_err(|e| invalid(e.to_string()))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| invalid("empty command line".to_string()))?;

        Ok(Self {
            program,
            leading_args: words.collect(),
            ..Self::default()
        })
    }

    /// Create a client from `PCLI_AWS_CLI`, falling back to plain `aws`.
    pub fn from_env() -> Result<Self> {
        match env_command_line() {
            Some(line) => Self::from_command_line(&line),
            None => Ok(Self::default()),
        }
    }

    /// Create a client from config, letting `PCLI_AWS_CLI` override `aws.program`.
    ///
    /// `aws.profile` and `aws.region` are forwarded to every invocation.
    pub fn from_config(config: &ConfigStore) -> Result<Self> {
        let command_line =
            env_command_line().or_else(|| config.get_str("aws.program"));

        let client = match command_line {
            Some(line) => Self::from_command_line(&line)?,
            None => Self::default(),
        };

        Ok(client
            .with_profile(config.get_str("aws.profile").as_deref())
            .with_region(config.get_str("aws.region").as_deref()))
    }

    pub fn with_profile(mut self, profile: Option<&str>) -> Self {
        self.profile = profile.map(str::to_string);
        self
    }

    pub fn with_region(mut self, region: Option<&str>) -> Self {
        self.region = region.map(str::to_string);
        self
    }

    /// Full argument list for an invocation, after the program name.
    pub fn args_for(&self, args: &[String]) -> Vec<String> {
        let mut full = self.leading_args.clone();
        if let Some(profile) = &self.profile {
            full.push("--profile".to_string());
            full.push(profile.clone());
        }
        if let Some(region) = &self.region {
            full.push("--region".to_string());
            full.push(region.clone());
        }
        full.extend(args.iter().cloned());
        full
    }

    /// Shell-quoted form of an invocation, for logs and error messages.
    pub fn command_line(&self, args: &[String]) -> String {
        shell_words::join(std::iter::once(self.program.clone()).chain(self.args_for(args)))
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(self.args_for(args));
        command
    }

    /// Run to completion, capturing stdout. Non-zero exit is an error.
    fn output(&self, args: &[String]) -> Result<Output> {
        let command_line = self.command_line(args);
        debug!(command = %command_line, "running external command");

        let output = self
            .command(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| PcliError::ExternalCommand {
                command: command_line.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                output.status.to_string()
            } else {
                format!("{}: {}", output.status, stderr)
            };
            return Err(PcliError::ExternalCommand {
                command: command_line,
                message,
            });
        }

        Ok(output)
    }

    /// List every log group with its metadata.
    pub fn describe_log_groups(&self) -> Result<DescribeLogGroupsResponse> {
        let args = to_args(&["logs", "describe-log-groups", "--output", "json"]);
        let output = self.output(&args)?;
        serde_json::from_slice(&output.stdout).map_err(|e| PcliError::Decode(e.to_string()))
    }
}

impl LogGroupSource for AwsCli {
    fn list_log_groups(&self) -> Result<Vec<String>> {
        let names = self.describe_log_groups()?.into_names();
        debug!(count = names.len(), "listed log groups");
        Ok(names)
    }
}

impl TailProcess for AwsCli {
    fn stream(&self, args: &[String]) -> Result<()> {
        let command_line = self.command_line(args);
        info!(command = %command_line, "running");

        // Inherited stdio streams output live and lets Ctrl+C reach the child.
        let status = self
            .command(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| PcliError::ExternalCommand {
                command: command_line.clone(),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(PcliError::ExternalCommand {
                command: command_line,
                message: status.to_string(),
            })
        }
    }
}

fn env_command_line() -> Option<String> {
    env::var(PROGRAM_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
