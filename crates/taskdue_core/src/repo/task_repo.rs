//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist analyzed tasks and read them back.
//! - Expose the `(id, stored due-date text)` snapshot used by due-date repair
//!   and apply a repair batch atomically.
//!
//! # Invariants
//! - Write paths reject empty task content.
//! - Read paths reject unknown priority values instead of masking them.
//! - Due-date text is read back verbatim, including legacy free text.
//! - A repair batch is all-or-nothing.

use crate::model::priority::PriorityLevel;
use crate::model::task::{TaskId, TaskRecord};
use crate::reconcile::DueDateRepair;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    content,
    due_date,
    priority
FROM tasks";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error surface for task storage: opening, schema upgrades, reads and
/// writes.
#[derive(Debug)]
pub enum RepoError {
    Db(rusqlite::Error),
    /// The file was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    NotFound(TaskId),
    EmptyContent,
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "task database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::EmptyContent => write!(f, "task content must not be empty"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(value)
    }
}

/// Repository interface for stored tasks.
pub trait TaskRepository {
    fn create_task(&self, task: &TaskRecord) -> RepoResult<TaskId>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>>;
    /// Lists tasks in insertion order.
    fn list_tasks(&self) -> RepoResult<Vec<TaskRecord>>;
    /// Returns `(id, stored due-date text)` for every task.
    fn list_due_dates(&self) -> RepoResult<Vec<(TaskId, Option<String>)>>;
    /// Writes every repaired value in one transaction and returns the number
    /// of rows written.
    fn apply_due_date_repairs(&mut self, repairs: &[DueDateRepair]) -> RepoResult<usize>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        if !tasks_table_exists(conn)? {
            return Err(RepoError::MissingRequiredTable("tasks"));
        }
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &TaskRecord) -> RepoResult<TaskId> {
        if task.content.trim().is_empty() {
            return Err(RepoError::EmptyContent);
        }

        self.conn.execute(
            "INSERT INTO tasks (uuid, content, due_date, priority)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.id.to_string(),
                task.content.as_str(),
                task.due_date.as_deref(),
                priority_to_db(task.priority),
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_tasks(&self) -> RepoResult<Vec<TaskRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn list_due_dates(&self) -> RepoResult<Vec<(TaskId, Option<String>)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, due_date FROM tasks ORDER BY created_at ASC, rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut due_dates = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get("uuid")?;
            due_dates.push((parse_uuid(&uuid_text)?, row.get("due_date")?));
        }
        Ok(due_dates)
    }

    fn apply_due_date_repairs(&mut self, repairs: &[DueDateRepair]) -> RepoResult<usize> {
        if repairs.is_empty() {
            return Ok(0);
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        for repair in repairs {
            let changed = tx.execute(
                "UPDATE tasks
                 SET
                    due_date = ?1,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?2;",
                params![repair.repaired.to_string(), repair.id.to_string()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound(repair.id));
            }
        }
        tx.commit()?;

        Ok(repairs.len())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<TaskRecord> {
    let uuid_text: String = row.get("uuid")?;
    let priority_text: String = row.get("priority")?;
    let priority = parse_priority(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    Ok(TaskRecord {
        id: parse_uuid(&uuid_text)?,
        content: row.get("content")?,
        due_date: row.get("due_date")?,
        priority,
    })
}

fn parse_uuid(value: &str) -> RepoResult<TaskId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in tasks.uuid")))
}

pub(crate) fn priority_to_db(priority: PriorityLevel) -> &'static str {
    match priority {
        PriorityLevel::High => "high",
        PriorityLevel::Medium => "medium",
        PriorityLevel::Low => "low",
    }
}

fn parse_priority(value: &str) -> Option<PriorityLevel> {
    match value {
        "high" => Some(PriorityLevel::High),
        "medium" => Some(PriorityLevel::Medium),
        "low" => Some(PriorityLevel::Low),
        _ => None,
    }
}

fn tasks_table_exists(conn: &Connection) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'tasks'
        );",
        [],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
