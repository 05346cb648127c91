// `pcli cache` subcommands.
// Clears, lists, shows, and refreshes cached entries with user-facing output.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;
use pcli::aws::AwsCli;
use pcli::cache::{CacheLayer, EntrySummary};

use super::{GlobalOptions, load_config};

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Clear all cached data.
    Clear,

    /// List all cached entries with details.
    List,

    /// Show a cached entry by key, e.g. `log_groups`.
    Get { key: String },

    /// Refresh cached data from AWS.
    Refresh,
}

/// Cache failures are reported but never fail the process.
pub fn run(cmd: CacheCommand, options: &GlobalOptions) -> ExitCode {
    if let Err(err) = execute(cmd, options) {
        println!("Error: {err:#}");
    }
    ExitCode::SUCCESS
}

fn execute(cmd: CacheCommand, options: &GlobalOptions) -> Result<()> {
    let config = load_config(options)?;
    let source = AwsCli::from_config(&config)?;
    let mut cache = CacheLayer::new(config, source);

    match cmd {
        CacheCommand::Clear => {
            println!("Clearing cache...");
            cache.clear()?;
            println!("Cache cleared successfully");
        }
        CacheCommand::List => {
            let entries = cache.list();
            if entries.is_empty() {
                println!("Cache is empty");
                return Ok(());
            }
            println!("Cached entries:\n");
            print!("{}", render_table(&entries));
            println!("\nTotal entries: {}", entries.len());
        }
        CacheCommand::Get { key } => match cache.get_entry(&key) {
            Some(value) => {
                println!("Cache entry '{}':\n", key);
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            None => {
                println!("Cache entry '{}' not found", key);
                println!("Use 'pcli cache list' to see available entries");
            }
        },
        CacheCommand::Refresh => {
            println!("Refreshing cache...");
            let report = cache.refresh_all();
            for (entry, err) in &report.failures {
                println!("Warning: error refreshing {}: {}", entry.key(), err);
            }
            if report.is_complete() {
                println!("Cache refreshed successfully");
            } else {
                println!(
                    "Cache refresh completed with {}/{} successful",
                    report.succeeded, report.total
                );
            }
        }
    }
    Ok(())
}

fn render_table(entries: &[EntrySummary]) -> String {
    let header = ["#", "Key", "Type", "Size"];
    let rows: Vec<[String; 4]> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            [
                (i + 1).to_string(),
                entry.key.clone(),
                entry.kind.to_string(),
                entry.size_label(),
            ]
        })
        .collect();

    let mut widths = header.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("| {} |\n", padded.join(" | "))
    };
    let separator = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|width| "-".repeat(width + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut table = separator.clone();
    table.push_str(&line(header));
    table.push_str(&separator);
    for row in &rows {
        table.push_str(&line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }
    table.push_str(&separator);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let entries = vec![EntrySummary {
            key: "log_groups".to_string(),
            kind: "sequence",
            size: Some(12),
        }];

        let table = render_table(&entries);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "+---+------------+----------+----------+");
        assert_eq!(lines[1], "| # | Key        | Type     | Size     |");
        assert_eq!(lines[3], "| 1 | log_groups | sequence | 12 items |");
    }
}
