//! Due-date expression normalizer.
//!
//! Parsing is attempted in order: strict `YYYY-MM-DD` → loose absolute date →
//! Japanese relative expression → `DueDate::Unknown`.
//!
//! Relative months are a fixed 30 days and weeks a fixed 7 days. This is not
//! calendar-month arithmetic and must stay that way: stored data and callers
//! rely on `来月` being exactly `reference + 30`.

use crate::model::due::{CanonicalDate, DueDate, UNKNOWN_DUE_DATE};
use chrono::{Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

const DAYS_PER_WEEK: u64 = 7;
const DAYS_PER_MONTH: u64 = 30;

const TODAY_WORDS: &[&str] = &["今日", "本日"];
const TOMORROW_WORDS: &[&str] = &["明日", "あした"];
const DAY_AFTER_TOMORROW_WORDS: &[&str] = &["明後日", "あさって"];
const NEXT_MONTH_WORD: &str = "来月";
const NEXT_WEEK_PREFIX: &str = "来週";

/// Compared ASCII case-insensitively, in addition to `UNKNOWN_DUE_DATE`.
const UNKNOWN_WORDS: &[&str] = &["unknown", "n/a"];

// Separators are matched independently, so "2025-8/7" is accepted. Lenient on
// purpose; tightening it would reject rows that earlier versions stored.
static LOOSE_ABSOLUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})[-/.]([0-9]{1,2})[-/.]([0-9]{1,2})$")
        .expect("valid loose absolute date regex")
});
static DAYS_LATER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*日後$").expect("valid days-later regex"));
static WEEKS_LATER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*週間?後$").expect("valid weeks-later regex"));
static MONTHS_LATER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)\s*(?:か月|ヶ月|月)後$").expect("valid months-later regex")
});

/// Normalizes raw due-date text against `reference` ("today").
///
/// Never fails: empty text, sentinel words (`unknown`, `n/a`, `不明`),
/// unrecognized text and out-of-range arithmetic all yield
/// `DueDate::Unknown`.
pub fn normalize_due_date(raw: &str, reference: NaiveDate) -> DueDate {
    let folded = fold_fullwidth_digits(raw.trim());
    let value = folded.as_ref();
    if is_unknown_marker(value) {
        return DueDate::Unknown;
    }

    parse_strict_iso(value)
        .or_else(|| parse_loose_absolute(value))
        .or_else(|| parse_relative_ja(value, reference))
        .map_or(DueDate::Unknown, DueDate::On)
}

/// Returns whether `raw` is exactly `YYYY-MM-DD` (no trimming).
pub fn is_strict_iso(raw: &str) -> bool {
    CanonicalDate::parse_strict(raw).is_some()
}

/// Accepts trimmed `YYYY-MM-DD` verbatim, without calendar validation.
pub fn parse_strict_iso(raw: &str) -> Option<CanonicalDate> {
    CanonicalDate::parse_strict(raw.trim())
}

/// Accepts `YYYY` + `-`/`/`/`.` + 1-2 digit month + `-`/`/`/`.` + 1-2 digit day
/// and re-emits it zero-padded.
pub fn parse_loose_absolute(raw: &str) -> Option<CanonicalDate> {
    let caps = LOOSE_ABSOLUTE_RE.captures(raw.trim())?;
    let component = |index: usize| caps.get(index)?.as_str().parse::<u32>().ok();
    CanonicalDate::new(component(1)?, component(2)?, component(3)?)
}

/// Resolves a Japanese relative expression against `reference`.
///
/// Supported forms: `今日`/`本日`, `明日`/`あした`, `明後日`/`あさって`,
/// `来週…` (prefix), `来月`, `N日後`, `N週後`/`N週間後`, `N か月後`/`Nヶ月後`/`N月後`.
pub fn parse_relative_ja(raw: &str, reference: NaiveDate) -> Option<CanonicalDate> {
    let value = raw.trim();

    let offset_days = if TODAY_WORDS.contains(&value) {
        0
    } else if TOMORROW_WORDS.contains(&value) {
        1
    } else if DAY_AFTER_TOMORROW_WORDS.contains(&value) {
        2
    } else if value.starts_with(NEXT_WEEK_PREFIX) {
        DAYS_PER_WEEK
    } else if let Some(count) = leading_count(&DAYS_LATER_RE, value) {
        count
    } else if let Some(count) = leading_count(&WEEKS_LATER_RE, value) {
        count.checked_mul(DAYS_PER_WEEK)?
    } else if let Some(count) = leading_count(&MONTHS_LATER_RE, value) {
        count.checked_mul(DAYS_PER_MONTH)?
    } else if value == NEXT_MONTH_WORD {
        DAYS_PER_MONTH
    } else {
        return None;
    };

    reference
        .checked_add_days(Days::new(offset_days))
        .and_then(CanonicalDate::from_naive)
}

fn leading_count(pattern: &Regex, value: &str) -> Option<u64> {
    pattern.captures(value)?.get(1)?.as_str().parse().ok()
}

fn is_unknown_marker(value: &str) -> bool {
    value.is_empty()
        || value == UNKNOWN_DUE_DATE
        || UNKNOWN_WORDS
            .iter()
            .any(|word| value.eq_ignore_ascii_case(word))
}

/// Maps full-width digits (`０`-`９`, U+FF10..=U+FF19) to ASCII so `３日後`
/// and `２０２５/８/７` take the same paths as their half-width spellings.
///
/// Only the full-width block is folded. Other Unicode decimal digits
/// (Arabic-Indic, Devanagari, ...) are left alone and do not match any
/// pattern, so such input normalizes to `Unknown`.
fn fold_fullwidth_digits(value: &str) -> Cow<'_, str> {
    if !value.chars().any(|ch| ('０'..='９').contains(&ch)) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .map(|ch| match ch {
                '０'..='９' => char::from_u32(u32::from(ch) - u32::from('０') + u32::from('0'))
                    .unwrap_or(ch),
                other => other,
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::{
        fold_fullwidth_digits, is_strict_iso, normalize_due_date, parse_loose_absolute,
        parse_relative_ja, parse_strict_iso,
    };
    use crate::model::due::DueDate;
    use chrono::NaiveDate;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    fn rendered(raw: &str, reference: NaiveDate) -> String {
        normalize_due_date(raw, reference).to_string()
    }

    #[test]
    fn strict_iso_passes_through_unchanged() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("2025-08-10", today), "2025-08-10");
        assert_eq!(rendered("2025-02-30", today), "2025-02-30");
        assert_eq!(parse_strict_iso(" 2025-08-10 ").unwrap().to_string(), "2025-08-10");
    }

    #[test]
    fn is_strict_iso_does_not_trim() {
        assert!(is_strict_iso("2025-08-10"));
        assert!(!is_strict_iso("2025-08-10 "));
        assert!(!is_strict_iso("2025-8-10"));
    }

    #[test]
    fn loose_absolute_dates_are_zero_padded() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("2025-8-7", today), "2025-08-07");
        assert_eq!(rendered("2025/08/07", today), "2025-08-07");
        assert_eq!(rendered("2025.8.07", today), "2025-08-07");
        assert_eq!(rendered("2025/08/7", today), "2025-08-07");
    }

    #[test]
    fn loose_absolute_accepts_mixed_separators() {
        let parsed = parse_loose_absolute("2025-8/7").expect("mixed separators accepted");
        assert_eq!(parsed.to_string(), "2025-08-07");
    }

    #[test]
    fn loose_absolute_rejects_wrong_widths() {
        assert!(parse_loose_absolute("25-8-7").is_none());
        assert!(parse_loose_absolute("2025-123-7").is_none());
        assert!(parse_loose_absolute("2025_8_7").is_none());
    }

    #[test]
    fn relative_keywords_resolve_against_reference() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("今日", today), "2025-01-01");
        assert_eq!(rendered("本日", today), "2025-01-01");
        assert_eq!(rendered("明日", today), "2025-01-02");
        assert_eq!(rendered("あした", today), "2025-01-02");
        assert_eq!(rendered("明後日", today), "2025-01-03");
        assert_eq!(rendered("あさって", today), "2025-01-03");
        assert_eq!(rendered("来月", today), "2025-01-31");
    }

    #[test]
    fn next_week_matches_as_prefix() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("来週", today), "2025-01-08");
        assert_eq!(rendered("来週の金曜日", today), "2025-01-08");
        assert_eq!(rendered("来週中", today), "2025-01-08");
    }

    #[test]
    fn counted_units_use_fixed_lengths() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("3日後", today), "2025-01-04");
        assert_eq!(rendered("2週間後", today), "2025-01-15");
        assert_eq!(rendered("2週後", today), "2025-01-15");
        assert_eq!(rendered("1か月後", today), "2025-01-31");
        assert_eq!(rendered("2ヶ月後", today), "2025-03-02");
        assert_eq!(rendered("1月後", today), "2025-01-31");
    }

    #[test]
    fn whitespace_between_count_and_unit_is_tolerated() {
        let today = day(2025, 1, 1);
        assert_eq!(rendered("3 日後", today), "2025-01-04");
        assert_eq!(rendered("2\u{3000}週間後", today), "2025-01-15");
        assert_eq!(rendered("  明日  ", today), "2025-01-02");
    }

    #[test]
    fn relative_patterns_require_full_match() {
        let today = day(2025, 1, 1);
        assert!(parse_relative_ja("明日まで", today).is_none());
        assert!(parse_relative_ja("約3日後", today).is_none());
        assert!(parse_relative_ja("3日後くらい", today).is_none());
        assert!(parse_relative_ja("来月末", today).is_none());
    }

    #[test]
    fn fullwidth_digits_are_folded() {
        let today = day(2025, 1, 1);
        assert_eq!(fold_fullwidth_digits("３日後"), "3日後");
        assert_eq!(rendered("３日後", today), "2025-01-04");
        assert_eq!(rendered("２０２５/８/７", today), "2025-08-07");
    }

    #[test]
    fn other_unicode_digits_are_not_folded() {
        let today = day(2025, 1, 1);
        assert_eq!(fold_fullwidth_digits("٣日後"), "٣日後");
        assert_eq!(normalize_due_date("٣日後", today), DueDate::Unknown);
        assert_eq!(normalize_due_date("३日後", today), DueDate::Unknown);
    }

    #[test]
    fn sentinels_and_gibberish_are_unknown() {
        let today = day(2025, 1, 1);
        for raw in ["", "   ", "unknown", "UNKNOWN", "Unknown", "N/A", "n/a", "不明", "asdf"] {
            assert_eq!(normalize_due_date(raw, today), DueDate::Unknown, "{raw:?}");
        }
    }

    #[test]
    fn overflowing_offsets_are_unknown() {
        let today = day(2025, 1, 1);
        assert!(normalize_due_date("99999999999999999999日後", today).is_unknown());
        assert!(normalize_due_date("9999999999999999週間後", today).is_unknown());
        assert!(normalize_due_date("3000000か月後", today).is_unknown());
        assert!(normalize_due_date("明日", day(9999, 12, 31)).is_unknown());
    }
}
