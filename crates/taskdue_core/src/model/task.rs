//! Stored task record.
//!
//! # Responsibility
//! - Carry the persisted shape of one analyzed task.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `due_date` holds the stored text verbatim. Rows written by core always
//!   hold a rendered `DueDate`; legacy rows may hold anything, which is what
//!   the due-date repair pass exists for.

use crate::model::due::DueDate;
use crate::model::priority::PriorityLevel;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a stored task.
pub type TaskId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    /// Original task text as entered by the user.
    pub content: String,
    /// Stored due-date text (`YYYY-MM-DD`, `不明`, or unrepaired legacy text).
    pub due_date: Option<String>,
    pub priority: PriorityLevel,
}

impl TaskRecord {
    /// Creates a record with a generated stable ID.
    pub fn new(content: impl Into<String>, due_date: DueDate, priority: PriorityLevel) -> Self {
        Self::with_id(Uuid::new_v4(), content, due_date, priority)
    }

    /// Creates a record with a caller-provided ID.
    pub fn with_id(
        id: TaskId,
        content: impl Into<String>,
        due_date: DueDate,
        priority: PriorityLevel,
    ) -> Self {
        Self {
            id,
            content: content.into(),
            due_date: Some(due_date.to_string()),
            priority,
        }
    }

    /// Interprets the stored text strictly. Anything other than a rendered
    /// `DueDate` reads as `Unknown`.
    pub fn due(&self) -> DueDate {
        self.due_date
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DueDate::Unknown)
    }
}
