//! `tasks` schema versioning.
//!
//! # Invariants
//! - The applied version is mirrored to `PRAGMA user_version`.
//! - Everything pending runs in one transaction; a failed import leaves the
//!   file untouched.
//! - An unversioned `tasks` table without a `uuid` column is the earlier
//!   integer-keyed store. Its rows are carried over in id order with fresh
//!   UUIDs; due-date text is copied verbatim and left to due-date repair.

use crate::normalize::priority::normalize_priority;
use crate::repo::task_repo::{priority_to_db, RepoError, RepoResult};
use log::info;
use rusqlite::{params, Connection};
use uuid::Uuid;

const TASKS_V1_SQL: &str = include_str!("0001_tasks.sql");
const LEGACY_TABLE: &str = "legacy_tasks";

/// Schema version written by this build.
const TASKS_SCHEMA_VERSION: u32 = 1;

struct LegacyRow {
    content: Option<String>,
    due_date: Option<String>,
    priority: Option<String>,
}

/// Latest schema version known by this build.
pub fn latest_version() -> u32 {
    TASKS_SCHEMA_VERSION
}

/// Brings `conn` to the current `tasks` schema.
///
/// Fails with `UnsupportedSchemaVersion` when the file was written by a newer
/// build.
pub fn apply_migrations(conn: &mut Connection) -> RepoResult<()> {
    let db_version = user_version(conn)?;
    if db_version > TASKS_SCHEMA_VERSION {
        return Err(RepoError::UnsupportedSchemaVersion {
            db_version,
            latest_supported: TASKS_SCHEMA_VERSION,
        });
    }
    if db_version == TASKS_SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    let legacy = has_legacy_tasks_table(&tx)?;
    if legacy {
        tx.execute_batch(&format!("ALTER TABLE tasks RENAME TO {LEGACY_TABLE};"))?;
    }
    tx.execute_batch(TASKS_V1_SQL)?;
    if legacy {
        let imported = import_legacy_rows(&tx)?;
        tx.execute_batch(&format!("DROP TABLE {LEGACY_TABLE};"))?;
        info!("event=legacy_import module=db status=ok rows={imported}");
    }
    tx.execute_batch(&format!("PRAGMA user_version = {TASKS_SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

fn user_version(conn: &Connection) -> RepoResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn has_legacy_tasks_table(conn: &Connection) -> RepoResult<bool> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('tasks');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(!columns.is_empty() && !columns.iter().any(|column| column == "uuid"))
}

/// Copies legacy rows into `tasks`. Priorities go through the normal label
/// table, so `High`/`Medium`/`Low` keep their rank and anything else
/// (including NULL) becomes medium. NULL content becomes empty text.
fn import_legacy_rows(conn: &Connection) -> RepoResult<usize> {
    let rows = read_legacy_rows(conn)?;
    let mut insert = conn.prepare(
        "INSERT INTO tasks (uuid, content, due_date, priority)
         VALUES (?1, ?2, ?3, ?4);",
    )?;
    for row in &rows {
        let priority = normalize_priority(row.priority.as_deref().unwrap_or_default());
        insert.execute(params![
            Uuid::new_v4().to_string(),
            row.content.as_deref().unwrap_or_default(),
            row.due_date.as_deref(),
            priority_to_db(priority),
        ])?;
    }

    Ok(rows.len())
}

fn read_legacy_rows(conn: &Connection) -> RepoResult<Vec<LegacyRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT content, due_date, priority FROM {LEGACY_TABLE} ORDER BY rowid ASC;"
    ))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(LegacyRow {
                content: row.get(0)?,
                due_date: row.get(1)?,
                priority: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
