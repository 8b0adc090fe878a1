//! Text-understanding collaborator contracts.
//!
//! # Responsibility
//! - Define how raw task text becomes raw due-date/priority candidates.
//! - Provide the fixed-value strategy and the completion-reply strategy.
//!
//! # Invariants
//! - Analyzers return raw strings only; normalization always happens in
//!   `reconcile`, never inside an analyzer.
//! - Which strategy runs is chosen by the caller per call, not by a global
//!   switch.

pub mod response;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use response::parse_candidates;

/// Raw, un-normalized candidates produced for one task text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidates {
    pub due_date: String,
    pub priority: String,
}

impl RawCandidates {
    pub fn new(due_date: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            due_date: due_date.into(),
            priority: priority.into(),
        }
    }
}

/// Collaborator failure. Callers degrade to default candidates instead of
/// surfacing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// The backing service could not be reached or refused the request.
    Unavailable(String),
    /// The service answered, but the response carried no reply text.
    InvalidResponse(String),
}

impl Display for AnalyzerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "task analyzer unavailable: {message}"),
            Self::InvalidResponse(message) => {
                write!(f, "task analyzer returned no usable reply: {message}")
            }
        }
    }
}

impl Error for AnalyzerError {}

/// Strategy that turns task prose into raw candidates.
pub trait TaskAnalyzer {
    fn analyze(&self, text: &str) -> Result<RawCandidates, AnalyzerError>;
}

/// Returns the same candidates for every task. Used for offline runs and for
/// callers that already know the due date and priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedAnalyzer {
    candidates: RawCandidates,
}

impl FixedAnalyzer {
    pub fn new(due_date: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            candidates: RawCandidates::new(due_date, priority),
        }
    }
}

impl TaskAnalyzer for FixedAnalyzer {
    fn analyze(&self, _text: &str) -> Result<RawCandidates, AnalyzerError> {
        Ok(self.candidates.clone())
    }
}

/// Source of raw model replies for a task text. Prompt construction and
/// transport belong to the implementor.
pub trait CompletionClient {
    fn complete(&self, task_text: &str) -> Result<String, AnalyzerError>;
}

/// Analyzer backed by a completion client whose reply is a JSON object.
pub struct CompletionAnalyzer<C: CompletionClient> {
    client: C,
}

impl<C: CompletionClient> CompletionAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl<C: CompletionClient> TaskAnalyzer for CompletionAnalyzer<C> {
    fn analyze(&self, text: &str) -> Result<RawCandidates, AnalyzerError> {
        let reply = self.client.complete(text)?;
        Ok(parse_candidates(&reply))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AnalyzerError, CompletionAnalyzer, CompletionClient, FixedAnalyzer, RawCandidates,
        TaskAnalyzer,
    };

    struct CannedClient(Result<String, AnalyzerError>);

    impl CompletionClient for CannedClient {
        fn complete(&self, _task_text: &str) -> Result<String, AnalyzerError> {
            self.0.clone()
        }
    }

    #[test]
    fn fixed_analyzer_ignores_task_text() {
        let analyzer = FixedAnalyzer::new("明日", "高");
        let first = analyzer.analyze("write report").unwrap();
        let second = analyzer.analyze("").unwrap();
        assert_eq!(first, RawCandidates::new("明日", "高"));
        assert_eq!(first, second);
    }

    #[test]
    fn completion_analyzer_parses_reply() {
        let analyzer = CompletionAnalyzer::new(CannedClient(Ok(
            "```json\n{\"期限\":\"2025-08-10\",\"優先度\":\"高\"}\n```".to_string(),
        )));
        let candidates = analyzer.analyze("report by aug 10").unwrap();
        assert_eq!(candidates, RawCandidates::new("2025-08-10", "高"));
    }

    #[test]
    fn completion_analyzer_propagates_client_failure() {
        let analyzer = CompletionAnalyzer::new(CannedClient(Err(AnalyzerError::Unavailable(
            "timeout".to_string(),
        ))));
        let err = analyzer.analyze("anything").unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn completion_analyzer_propagates_empty_envelope() {
        let analyzer = CompletionAnalyzer::new(CannedClient(Err(
            AnalyzerError::InvalidResponse("no choices".to_string()),
        )));
        let err = analyzer.analyze("anything").unwrap_err();
        assert_eq!(
            err,
            AnalyzerError::InvalidResponse("no choices".to_string())
        );
        assert!(err.to_string().contains("no usable reply"));
    }
}
