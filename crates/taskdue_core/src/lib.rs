//! Core logic for taskdue.
//!
//! Turns free-form task text into a normalized due date and priority, stores
//! the result, and repairs previously stored due dates.
//!
//! ```text
//! text ──► TaskAnalyzer ──► reconcile (normalize::date + normalize::priority)
//!                               │
//!                               ▼
//!                 TaskService ──► TaskRepository (SQLite)
//! ```
//!
//! `normalize` and `reconcile` are pure and usable on their own, without an
//! analyzer or a database.

pub mod analyzer;
pub mod db;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod repo;
pub mod service;

pub use analyzer::{
    parse_candidates, AnalyzerError, CompletionAnalyzer, CompletionClient, FixedAnalyzer,
    RawCandidates, TaskAnalyzer,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::due::{CanonicalDate, DueDate, DueDateParseError, UNKNOWN_DUE_DATE};
pub use model::priority::PriorityLevel;
pub use model::task::{TaskId, TaskRecord};
pub use normalize::date::normalize_due_date;
pub use normalize::priority::normalize_priority;
pub use reconcile::{
    reconcile, repair_due_date, repair_due_dates, DueDateRepair, RepairReport, TaskAssessment,
};
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use service::task_service::{TaskService, TaskServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
