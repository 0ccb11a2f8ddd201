//! `scheduler` entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and `SCHEDULER_*` variables.
//! - Start the HTTP server, or run one task command against the database.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, TaskCommand};
use log::info;
use scheduler_core::db::open_db;
use scheduler_core::{
    init_logging, init_stderr_logging, logging_status, Clock, Completion, FixedClock, SharedClock,
    SqliteTaskRepository, SystemClock, TaskDate, TaskDraft, TaskRepository, TaskService,
};
use scheduler_http::{router, serve, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli)?;

    let clock: SharedClock = match cli.today {
        Some(today) => Arc::new(FixedClock(today)),
        None => Arc::new(SystemClock),
    };
    let conn = open_db(&cli.db_file)
        .with_context(|| format!("failed to open database `{}`", cli.db_file.display()))?;

    match cli.command {
        Command::Serve {
            host,
            port,
            web_dir,
        } => {
            let log_target = log_target_label(logging_status());
            info!(
                "event=server_start module=cli status=start port={port} web_dir={} log_target={log_target}",
                web_dir.display()
            );
            let app = router(AppState::new(conn, clock), &web_dir);
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime
                .block_on(serve(SocketAddr::new(host, port), app))
                .with_context(|| format!("server on port {port} stopped"))?;
        }
        Command::Task(command) => {
            let today = clock.today();
            let repo = SqliteTaskRepository::try_new(&conn)?;
            run_command(command, &TaskService::with_clock(repo, clock), today)?;
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let level = cli
        .log_level
        .as_deref()
        .unwrap_or_else(|| cli.command.default_log_level());
    match cli.log_dir.as_deref() {
        Some(dir) => init_logging(level, dir),
        None => init_stderr_logging(level),
    }
    .map_err(anyhow::Error::msg)
}

fn log_target_label(status: Option<(&'static str, Option<PathBuf>)>) -> String {
    match status {
        Some((_, Some(dir))) => dir.display().to_string(),
        Some((_, None)) => "stderr".to_string(),
        None => "none".to_string(),
    }
}

fn run_command<R: TaskRepository, C: Clock>(
    command: TaskCommand,
    service: &TaskService<R, C>,
    today: TaskDate,
) -> Result<()> {
    match command {
        TaskCommand::NextDate { now, date, repeat } => {
            println!("{}", service.next_date(now, &date, &repeat)?);
        }
        TaskCommand::Add {
            date,
            title,
            comment,
            repeat,
        } => {
            let id = service.create_task(&TaskDraft {
                date,
                title,
                comment,
                repeat,
            })?;
            println!("{id}");
        }
        TaskCommand::List { limit } => {
            for task in service.list_tasks(limit)? {
                let marker = if task.is_overdue(today) { "!" } else { " " };
                println!(
                    "{marker} {}\t{}\t{}\t{}",
                    task.id, task.date, task.repeat, task.title
                );
            }
        }
        TaskCommand::Show { id } => {
            let task = service.get_task(id)?;
            println!("id:      {}", task.id);
            println!("date:    {}", task.date);
            println!("title:   {}", task.title);
            println!("comment: {}", task.comment);
            println!("repeat:  {}", task.repeat);
        }
        TaskCommand::Done { id } => match service.mark_done(id)? {
            Completion::Removed => println!("task {id} done and removed"),
            Completion::Rescheduled(next) => println!("task {id} rescheduled to {next}"),
        },
        TaskCommand::Delete { id } => {
            service.delete_task(id)?;
            println!("task {id} deleted");
        }
    }
    Ok(())
}
