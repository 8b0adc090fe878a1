//! Parsing of completion replies into raw candidates.
//!
//! Replies are expected to be one JSON object, optionally wrapped in a
//! markdown code fence. Anything else degrades to default candidates.

use super::RawCandidates;
use crate::model::priority::PriorityLevel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

const DUE_DATE_KEYS: &[&str] = &["期限", "due_date"];
const PRIORITY_KEYS: &[&str] = &["優先度", "priority"];

static LEADING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```(?:json)?").expect("valid leading fence regex"));
static TRAILING_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```$").expect("valid trailing fence regex"));

/// Extracts raw candidates from a completion reply.
///
/// - Due date: first non-empty string under `期限`, then `due_date`; else `""`.
/// - Priority: first non-empty string under `優先度`, then `priority`; else `中`.
/// - Values are trimmed. Malformed JSON or a non-object reply yields the
///   defaults.
pub fn parse_candidates(reply: &str) -> RawCandidates {
    let body = strip_code_fence(reply);
    let fields = match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    };

    RawCandidates {
        due_date: first_text(&fields, DUE_DATE_KEYS)
            .unwrap_or_default()
            .trim()
            .to_string(),
        priority: first_text(&fields, PRIORITY_KEYS)
            .unwrap_or(PriorityLevel::Medium.locale_label())
            .trim()
            .to_string(),
    }
}

fn strip_code_fence(reply: &str) -> String {
    let without_leading = LEADING_FENCE_RE.replace(reply.trim(), "");
    TRAILING_FENCE_RE
        .replace(without_leading.trim(), "")
        .trim()
        .to_string()
}

fn first_text<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
}
