//! Task use-case service.
//!
//! # Responsibility
//! - Register tasks: analyze text, reconcile candidates, persist the result.
//! - Repair stored due dates in place.
//!
//! # Invariants
//! - Analyzer failures never reach callers; they degrade to an unknown due
//!   date and medium priority.
//! - The reference day is always passed in; the service never reads the
//!   clock.

use crate::analyzer::{RawCandidates, TaskAnalyzer};
use crate::model::task::{TaskId, TaskRecord};
use crate::reconcile::{reconcile, repair_due_dates, RepairReport, TaskAssessment};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Task text is empty after trimming.
    EmptyContent,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "task content must not be empty"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EmptyContent => Self::EmptyContent,
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over a repository implementation.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Analyzes and normalizes `text` without storing anything.
    pub fn assess(
        &self,
        text: &str,
        analyzer: &dyn TaskAnalyzer,
        today: NaiveDate,
    ) -> TaskAssessment {
        let candidates = analyzer.analyze(text).unwrap_or_else(|err| {
            warn!("event=task_analyze module=service status=degraded error={err}");
            RawCandidates::default()
        });
        reconcile(&candidates.due_date, &candidates.priority, today)
    }

    /// Analyzes `text`, stores the normalized task and returns the stored row.
    pub fn register_task(
        &self,
        text: &str,
        analyzer: &dyn TaskAnalyzer,
        today: NaiveDate,
    ) -> Result<TaskRecord, TaskServiceError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(TaskServiceError::EmptyContent);
        }

        let assessment = self.assess(content, analyzer, today);
        let record = TaskRecord::new(content, assessment.due_date, assessment.priority);
        let id = self.repo.create_task(&record)?;
        info!(
            "event=task_register module=service status=ok task_id={id} due_known={} priority={}",
            !assessment.due_date.is_unknown(),
            assessment.priority
        );

        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "registered task not found in read-back",
            ))
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<TaskRecord>> {
        self.repo.get_task(id)
    }

    pub fn list_tasks(&self) -> RepoResult<Vec<TaskRecord>> {
        self.repo.list_tasks()
    }

    /// Re-normalizes every stored due date against `now` and writes the
    /// values that changed.
    ///
    /// Safe to re-run: a second pass reports zero fixes.
    pub fn fix_due_dates(&mut self, now: NaiveDate) -> Result<RepairReport, TaskServiceError> {
        let snapshot = self.repo.list_due_dates()?;
        let report = repair_due_dates(snapshot, now);
        let written = self.repo.apply_due_date_repairs(&report.changes)?;
        if written != report.fixed() {
            return Err(TaskServiceError::InconsistentState(
                "repair write count differs from computed changes",
            ));
        }

        info!(
            "event=due_repair module=service status=ok scanned={} fixed={}",
            report.scanned,
            report.fixed()
        );
        Ok(report)
    }
}
