//! Priority rank model.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Three-rank task priority. `Medium` is the default for missing or
/// unrecognized labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriorityLevel {
    High,
    #[default]
    Medium,
    Low,
}

impl PriorityLevel {
    /// Stable English name used in serialized results.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Single-character Japanese label (`高`/`中`/`低`).
    pub fn locale_label(self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        }
    }
}

impl Display for PriorityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
