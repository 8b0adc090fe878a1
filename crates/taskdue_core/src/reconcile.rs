//! Result reconciliation for analyzed tasks and stored due dates.
//!
//! # Responsibility
//! - Combine raw due-date and priority candidates into one assessment.
//! - Compute which stored due-date values need rewriting, without touching
//!   storage.
//!
//! # Invariants
//! - Every repaired value is either strict `YYYY-MM-DD` or `不明`, so a second
//!   repair pass over its own output reports no changes.
//! - Only rows whose stored text differs from the repaired text are reported.

use crate::model::due::DueDate;
use crate::model::priority::PriorityLevel;
use crate::model::task::TaskId;
use crate::normalize::date::normalize_due_date;
use crate::normalize::priority::normalize_priority;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Normalized `{due_date, priority}` pair for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssessment {
    pub due_date: DueDate,
    pub priority: PriorityLevel,
}

/// Normalizes one pair of raw candidates against `reference`.
pub fn reconcile(
    candidate_due: &str,
    candidate_priority: &str,
    reference: NaiveDate,
) -> TaskAssessment {
    TaskAssessment {
        due_date: normalize_due_date(candidate_due, reference),
        priority: normalize_priority(candidate_priority),
    }
}

/// One stored due date that needs rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateRepair {
    pub id: TaskId,
    /// Stored text before repair (`None` for SQL NULL).
    pub previous: Option<String>,
    pub repaired: DueDate,
}

/// Outcome of one repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Number of rows inspected.
    pub scanned: usize,
    /// Rows whose value changes, in input order.
    pub changes: Vec<DueDateRepair>,
}

impl RepairReport {
    /// Number of rows that need a write. Zero is the common steady state.
    pub fn fixed(&self) -> usize {
        self.changes.len()
    }
}

/// Re-normalizes one stored value.
///
/// Strict `YYYY-MM-DD` text is kept as is; anything else goes through the
/// loose and relative parsers with `now` as reference. Stored free text
/// carries no anchor date, so a relative phrase is read against the repair
/// day, not the day it was written.
pub fn repair_due_date(stored: Option<&str>, now: NaiveDate) -> DueDate {
    normalize_due_date(stored.unwrap_or_default(), now)
}

/// Computes the repairs for a snapshot of `(id, stored due-date text)` rows.
pub fn repair_due_dates<I>(rows: I, now: NaiveDate) -> RepairReport
where
    I: IntoIterator<Item = (TaskId, Option<String>)>,
{
    let mut report = RepairReport::default();
    for (id, stored) in rows {
        report.scanned += 1;
        let repaired = repair_due_date(stored.as_deref(), now);
        if stored.as_deref() != Some(repaired.to_string().as_str()) {
            report.changes.push(DueDateRepair {
                id,
                previous: stored,
                repaired,
            });
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{reconcile, repair_due_date, repair_due_dates, TaskAssessment};
    use crate::model::due::DueDate;
    use crate::model::priority::PriorityLevel;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn reconcile_next_week_and_urgent() {
        let assessment = reconcile("来週", "至急", day(2025, 6, 1));
        assert_eq!(assessment.due_date.to_string(), "2025-06-08");
        assert_eq!(assessment.priority, PriorityLevel::High);
    }

    #[test]
    fn reconcile_defaults_for_empty_candidates() {
        let assessment = reconcile("", "", day(2025, 6, 1));
        assert_eq!(
            assessment,
            TaskAssessment {
                due_date: DueDate::Unknown,
                priority: PriorityLevel::Medium,
            }
        );
    }

    #[test]
    fn assessment_serializes_with_stable_field_names() {
        let json = serde_json::to_value(reconcile("来週", "至急", day(2025, 6, 1))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"due_date": "2025-06-08", "priority": "High"})
        );
    }

    #[test]
    fn repair_single_values() {
        let now = day(2025, 1, 1);
        assert!(repair_due_date(None, now).is_unknown());
        assert!(repair_due_date(Some(""), now).is_unknown());
        assert_eq!(repair_due_date(Some("2025-13-40"), now).to_string(), "2025-13-40");
        assert_eq!(repair_due_date(Some("2025/8/7"), now).to_string(), "2025-08-07");
        assert_eq!(repair_due_date(Some("明日"), now).to_string(), "2025-01-02");
        assert!(repair_due_date(Some("unknown"), now).is_unknown());
    }

    #[test]
    fn repair_reports_only_changed_rows() {
        let now = day(2025, 1, 1);
        let keep = Uuid::new_v4();
        let loose = Uuid::new_v4();
        let null = Uuid::new_v4();
        let sentinel = Uuid::new_v4();
        let english_unknown = Uuid::new_v4();

        let report = repair_due_dates(
            vec![
                (keep, Some("2025-03-04".to_string())),
                (loose, Some("2025/3/4".to_string())),
                (null, None),
                (sentinel, Some("不明".to_string())),
                (english_unknown, Some("UNKNOWN".to_string())),
            ],
            now,
        );

        assert_eq!(report.scanned, 5);
        assert_eq!(report.fixed(), 3);
        let changed: Vec<_> = report.changes.iter().map(|change| change.id).collect();
        assert_eq!(changed, vec![loose, null, english_unknown]);
        assert_eq!(report.changes[0].repaired.to_string(), "2025-03-04");
        assert_eq!(report.changes[0].previous.as_deref(), Some("2025/3/4"));
        assert!(report.changes[1].repaired.is_unknown());
        assert!(report.changes[2].repaired.is_unknown());
    }

    #[test]
    fn repair_output_is_a_fixed_point() {
        let now = day(2025, 1, 1);
        let rows: Vec<_> = ["2025/3/4", "", "3日後", "garbage", "2025-01-09", " 2025-01-09 "]
            .into_iter()
            .map(|value| (Uuid::new_v4(), Some(value.to_string())))
            .collect();

        let first = repair_due_dates(rows.clone(), now);
        assert_eq!(first.fixed(), 5);

        let repaired_rows: Vec<_> = rows
            .into_iter()
            .map(|(id, stored)| {
                let next = first
                    .changes
                    .iter()
                    .find(|change| change.id == id)
                    .map(|change| Some(change.repaired.to_string()))
                    .unwrap_or(stored);
                (id, next)
            })
            .collect();

        let second = repair_due_dates(repaired_rows, day(2030, 6, 1));
        assert_eq!(second.scanned, 6);
        assert_eq!(second.fixed(), 0);
    }
}
