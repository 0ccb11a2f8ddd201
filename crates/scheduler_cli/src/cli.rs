//! Command-line arguments and environment configuration.
//!
//! Every global option can also be set through a `SCHEDULER_*` variable.

use clap::{Parser, Subcommand};
use scheduler_core::{TaskDate, TaskId};
use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scheduler", version, about = "Personal task scheduler with recurring tasks")]
pub struct Cli {
    /// SQLite database file; created with its schema on first use.
    #[arg(long, env = "SCHEDULER_DB_FILE", default_value = "scheduler.db", global = true)]
    pub db_file: PathBuf,

    /// trace|debug|info|warn|error. Defaults by build mode for `serve`, `warn` otherwise.
    #[arg(long, env = "SCHEDULER_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; logs go to stderr when unset.
    #[arg(long, env = "SCHEDULER_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    /// Pin "today" (YYYYMMDD) instead of using the local system date.
    #[arg(long, env = "SCHEDULER_TODAY", global = true, value_parser = parse_date)]
    pub today: Option<TaskDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the HTTP API and web client server.
    Serve {
        #[arg(long, env = "SCHEDULER_HOST", default_value = "0.0.0.0")]
        host: IpAddr,
        #[arg(long, env = "SCHEDULER_PORT", default_value_t = 7540)]
        port: u16,
        /// Directory served for every non-API path.
        #[arg(long, env = "SCHEDULER_WEB_DIR", default_value = "web")]
        web_dir: PathBuf,
    },
    #[command(flatten)]
    Task(TaskCommand),
}

/// Commands that run against the database without the server.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Print the next occurrence of a repeat rule.
    NextDate {
        /// Reference day; only occurrences on or after it count.
        #[arg(long, value_parser = parse_date)]
        now: TaskDate,
        #[arg(long)]
        date: String,
        #[arg(long)]
        repeat: String,
    },
    /// Create a task and print its identifier.
    Add {
        #[arg(long, default_value = "")]
        date: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, default_value = "")]
        repeat: String,
    },
    /// List tasks by due date.
    List {
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one task.
    Show { id: TaskId },
    /// Mark a task done: remove it, or move it to its next occurrence.
    Done { id: TaskId },
    /// Delete a task.
    Delete { id: TaskId },
}

impl Command {
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Serve { .. } => scheduler_core::default_log_level(),
            Self::Task(_) => "warn",
        }
    }
}

fn parse_date(raw: &str) -> Result<TaskDate, String> {
    TaskDate::parse(raw).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, TaskCommand};
    use clap::Parser;
    use scheduler_core::TaskDate;

    #[test]
    fn serve_uses_defaults() {
        let cli = Cli::try_parse_from(["scheduler", "serve"]).unwrap();
        match cli.command {
            Command::Serve { port, web_dir, .. } => {
                assert_eq!(port, 7540);
                assert_eq!(web_dir.to_str(), Some("web"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "scheduler",
            "add",
            "--title",
            "gym",
            "--repeat",
            "d 2",
            "--today",
            "20250601",
            "--db-file",
            "/tmp/tasks.db",
        ])
        .unwrap();
        assert_eq!(cli.today, Some(TaskDate::parse("20250601").unwrap()));
        assert_eq!(cli.db_file.to_str(), Some("/tmp/tasks.db"));
        assert!(matches!(
            cli.command,
            Command::Task(TaskCommand::Add { ref repeat, .. }) if repeat == "d 2"
        ));
    }

    #[test]
    fn next_date_requires_reference_day() {
        assert!(Cli::try_parse_from([
            "scheduler",
            "next-date",
            "--date",
            "20250301",
            "--repeat",
            "d 3"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "scheduler",
            "next-date",
            "--now",
            "20250310",
            "--date",
            "20250301",
            "--repeat",
            "d 3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Task(TaskCommand::NextDate { now, .. })
                if now == TaskDate::parse("20250310").unwrap()
        ));
    }

    #[test]
    fn malformed_dates_are_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["scheduler", "list", "--today", "2025-06-01"]).is_err());
        assert!(Cli::try_parse_from([
            "scheduler",
            "next-date",
            "--now",
            "x",
            "--date",
            "20250101",
            "--repeat",
            "y"
        ])
        .is_err());
    }
}
