//! Command-line arguments.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "taskdue", version, about = "Normalize task due dates and priorities")]
pub struct Cli {
    /// SQLite database file.
    #[arg(long, env = "TASKDUE_DB", default_value = "tasks.db", global = true)]
    pub db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "TASKDUE_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute log directory. File logging stays off when unset.
    #[arg(long, env = "TASKDUE_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// Reference day for relative expressions (YYYY-MM-DD). Defaults to the
    /// local calendar date.
    #[arg(long, env = "TASKDUE_TODAY", global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the normalized form of a due-date expression.
    Date { raw: String },
    /// Print the normalized priority for a label.
    Priority { raw: String },
    /// Print the `{due_date, priority}` JSON for raw candidates.
    Reconcile {
        #[arg(long, default_value = "")]
        due: String,
        #[arg(long, default_value = "")]
        priority: String,
    },
    /// Store a task with the given raw due date and priority.
    Add {
        text: String,
        #[arg(long, default_value = "")]
        due: String,
        #[arg(long, default_value = "")]
        priority: String,
    },
    /// Print all stored tasks as JSON.
    List,
    /// Re-normalize stored due dates and print how many changed.
    FixDueDates,
    /// Print the core version.
    Version,
}

impl Command {
    /// Stable subcommand name for log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date { .. } => "date",
            Self::Priority { .. } => "priority",
            Self::Reconcile { .. } => "reconcile",
            Self::Add { .. } => "add",
            Self::List => "list",
            Self::FixDueDates => "fix-due-dates",
            Self::Version => "version",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_reference_day_and_subcommand() {
        let cli = Cli::try_parse_from([
            "taskdue",
            "--today",
            "2025-06-01",
            "reconcile",
            "--due",
            "来週",
            "--priority",
            "至急",
        ])
        .unwrap();
        assert_eq!(cli.today.unwrap().to_string(), "2025-06-01");
        match cli.command {
            Command::Reconcile { due, priority } => {
                assert_eq!(due, "来週");
                assert_eq!(priority, "至急");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_reference_day() {
        assert!(Cli::try_parse_from(["taskdue", "--today", "2025/06/01", "list"]).is_err());
    }

    #[test]
    fn command_names_match_cli_spelling() {
        let cli = Cli::try_parse_from(["taskdue", "fix-due-dates"]).unwrap();
        assert_eq!(cli.command.name(), "fix-due-dates");
    }
}
