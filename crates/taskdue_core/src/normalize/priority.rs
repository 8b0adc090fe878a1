//! Priority label normalizer.

use crate::model::priority::PriorityLevel;

/// Compared after trimming and lowercasing. The single-character `高` is not
/// a High label and falls through to `Medium`, while `低` is Low.
const HIGH_LABELS: &[&str] = &["high", "urgent", "重要", "至急"];
const LOW_LABELS: &[&str] = &["low", "低"];

/// Maps a free-text priority label to a rank.
///
/// Unrecognized and empty labels are `Medium`; this is the default, not an
/// error. Absent labels should go through `Option::unwrap_or_default` on the
/// caller side or be passed as `""`.
pub fn normalize_priority(raw: &str) -> PriorityLevel {
    let label = raw.trim().to_lowercase();
    if HIGH_LABELS.contains(&label.as_str()) {
        PriorityLevel::High
    } else if LOW_LABELS.contains(&label.as_str()) {
        PriorityLevel::Low
    } else {
        PriorityLevel::Medium
    }
}
