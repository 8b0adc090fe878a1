//! Subcommand dispatch.

use crate::cli::{Cli, Command};
use log::info;
use std::error::Error;
use std::io::Write;
use taskdue_core::db::open_db;
use taskdue_core::{
    core_version, normalize_due_date, normalize_priority, reconcile, FixedAnalyzer,
    SqliteTaskRepository, TaskService,
};

/// Runs one parsed command and writes its output line to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), Box<dyn Error>> {
    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    info!(
        "event=cli_run module=cli status=start command={} today={today}",
        cli.command.name()
    );

    match cli.command {
        Command::Date { raw } => writeln!(out, "{}", normalize_due_date(&raw, today))?,
        Command::Priority { raw } => writeln!(out, "{}", normalize_priority(&raw))?,
        Command::Reconcile { due, priority } => {
            let assessment = reconcile(&due, &priority, today);
            writeln!(out, "{}", serde_json::to_string(&assessment)?)?;
        }
        Command::Add {
            text,
            due,
            priority,
        } => {
            let mut conn = open_db(&cli.db)?;
            let service = TaskService::new(SqliteTaskRepository::try_new(&mut conn)?);
            let analyzer = FixedAnalyzer::new(due, priority);
            let task = service.register_task(&text, &analyzer, today)?;
            writeln!(out, "{}", serde_json::to_string(&task)?)?;
        }
        Command::List => {
            let mut conn = open_db(&cli.db)?;
            let service = TaskService::new(SqliteTaskRepository::try_new(&mut conn)?);
            writeln!(out, "{}", serde_json::to_string(&service.list_tasks()?)?)?;
        }
        Command::FixDueDates => {
            let mut conn = open_db(&cli.db)?;
            let mut service = TaskService::new(SqliteTaskRepository::try_new(&mut conn)?);
            let report = service.fix_due_dates(today)?;
            writeln!(out, "{}", serde_json::json!({ "fixed": report.fixed() }))?;
        }
        Command::Version => writeln!(out, "taskdue_core version={}", core_version())?,
    }

    Ok(())
}
