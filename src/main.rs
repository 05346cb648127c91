// pcli command-line entry point.
// Parses arguments, answers shell completion requests, and dispatches subcommands.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::CompleteEnv;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{CacheCommand, LogsCommand};

/// Developer productivity tool for CloudWatch logs.
#[derive(Parser, Debug)]
#[command(
    name = "pcli",
    version,
    about = "pcli: view and stream CloudWatch logs, with a local log group cache"
)]
struct Cli {
    /// Config file path (default: $HOME/.pcli.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// View and stream application logs.
    Logs {
        #[command(subcommand)]
        cmd: LogsCommand,
    },

    /// Manage CLI cache and cached data.
    Cache {
        #[command(subcommand)]
        cmd: CacheCommand,
    },
}

fn main() -> ExitCode {
    // `COMPLETE=<shell> pcli` prints the registration script; the shell then
    // calls back here and exits before any logging is installed.
    CompleteEnv::with_factory(Cli::command).complete();

    let cli = Cli::parse();
    install_tracing(tracing_level(&cli));

    let options = commands::GlobalOptions {
        config: cli.config,
        quiet: cli.quiet,
    };
    match cli.cmd {
        Command::Logs { cmd } => commands::logs::run(cmd, &options),
        Command::Cache { cmd } => commands::cache::run(cmd, &options),
    }
}

/// Completion output is read by the shell, so it only ever sees warnings.
fn tracing_level(cli: &Cli) -> Level {
    let completing = matches!(
        cli.cmd,
        Command::Logs {
            cmd: LogsCommand::Complete { .. }
        }
    );
    if completing || cli.quiet {
        Level::WARN
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn install_tracing(level: Level) {
    // RUST_LOG directives are honoured on top of the default level.
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
