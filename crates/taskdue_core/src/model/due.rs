//! Canonical due-date model.
//!
//! # Responsibility
//! - Represent a normalized due date or the explicit unknown sentinel.
//! - Own the fixed external text forms shared with storage and callers.
//!
//! # Invariants
//! - `CanonicalDate` keeps the parsed numeric components verbatim; absolute
//!   inputs are not calendar-validated (`2025-02-30` is representable).
//! - Dates built from `chrono::NaiveDate` are restricted to years 0..=9999 so
//!   the 4-digit year form always holds.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Reserved stored/serialized spelling of [`DueDate::Unknown`].
pub const UNKNOWN_DUE_DATE: &str = "不明";

const MAX_CANONICAL_YEAR: i32 = 9999;

static STRICT_ISO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").expect("valid strict iso regex")
});

/// Calendar date in canonical `YYYY-MM-DD` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate {
    year: u32,
    month: u32,
    day: u32,
}

impl CanonicalDate {
    /// Builds a date from raw components without calendar validation.
    ///
    /// Components wider than the canonical widths are rejected so rendering
    /// stays 4-2-2 digits.
    pub fn new(year: u32, month: u32, day: u32) -> Option<Self> {
        if year > 9999 || month > 99 || day > 99 {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// Converts a real calendar date, rejecting years outside 0..=9999.
    pub fn from_naive(date: NaiveDate) -> Option<Self> {
        if !(0..=MAX_CANONICAL_YEAR).contains(&date.year()) {
            return None;
        }
        Some(Self {
            year: date.year().unsigned_abs(),
            month: date.month(),
            day: date.day(),
        })
    }

    /// Parses exactly `YYYY-MM-DD` with ASCII digits. No calendar validation.
    pub fn parse_strict(value: &str) -> Option<Self> {
        let caps = STRICT_ISO_RE.captures(value)?;
        let component = |index: usize| caps.get(index)?.as_str().parse::<u32>().ok();
        Self::new(component(1)?, component(2)?, component(3)?)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns the real calendar date, or `None` when components are not a
    /// valid date (for example `2025-13-01`).
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(i32::try_from(self.year).ok()?, self.month, self.day)
    }
}

impl Display for CanonicalDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<CanonicalDate> for DueDate {
    fn from(value: CanonicalDate) -> Self {
        Self::On(value)
    }
}

/// Normalized due date: a canonical date or the explicit unknown sentinel.
///
/// Serialized as its text form (`"2025-06-08"` or `"不明"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DueDate {
    On(CanonicalDate),
    Unknown,
}

impl DueDate {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the canonical date when one was determined.
    pub fn date(&self) -> Option<CanonicalDate> {
        match self {
            Self::On(date) => Some(*date),
            Self::Unknown => None,
        }
    }
}

impl Display for DueDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On(date) => write!(f, "{date}"),
            Self::Unknown => f.write_str(UNKNOWN_DUE_DATE),
        }
    }
}

/// Error for text that is neither strict `YYYY-MM-DD` nor the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueDateParseError(pub String);

impl Display for DueDateParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "due date `{}` is neither YYYY-MM-DD nor `{UNKNOWN_DUE_DATE}`",
            self.0
        )
    }
}

impl Error for DueDateParseError {}

impl FromStr for DueDate {
    type Err = DueDateParseError;

    /// Strict parse of already-normalized text. Use
    /// [`crate::normalize::date::normalize_due_date`] for free text.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == UNKNOWN_DUE_DATE {
            return Ok(Self::Unknown);
        }
        CanonicalDate::parse_strict(value)
            .map(Self::On)
            .ok_or_else(|| DueDateParseError(value.to_string()))
    }
}

impl From<DueDate> for String {
    fn from(value: DueDate) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DueDate {
    type Error = DueDateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
