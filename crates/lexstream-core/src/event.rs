//! Classification of decoded stream payloads.
//!
//! One decoded JSON value maps to exactly one of: a terminal result, an
//! in-progress step update, or nothing. The function is pure so the live UI
//! branch and the persistence branch classify identically.

use serde_json::Value;

use crate::normalize::{get_string, normalize_legal_result, normalize_progress};
use crate::types::{
    AnalysisResult, DEFAULT_CASUAL_MESSAGE, DEFAULT_ERROR_MESSAGE, ProgressUpdate, UNKNOWN_SESSION,
};

/// Outcome of classifying one decoded payload.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The run is over: success or upstream-declared error.
    Terminal(AnalysisResult),
    /// One step update for the progress ledger.
    Progress(ProgressUpdate),
    /// Valid JSON with no recognised shape; skipped.
    Ignore,
}

impl StreamEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }
}

/// Classify one decoded JSON value.
///
/// A nested `final_result` object is dispatched on its `type`:
/// `error` and `legal_analysis` map to their respective results, while
/// `casual_response` is carried as an [`AnalysisResult::Error`] holding the
/// casual message (there is no dedicated chat rendering path). Otherwise a
/// string-typed `step` field marks a progress update. Everything else is
/// ignored.
pub fn classify(value: &Value) -> StreamEvent {
    if !value.is_object() {
        return StreamEvent::Ignore;
    }

    if let Some(final_result) = value.get("final_result").filter(|v| v.is_object()) {
        return match final_result.get("type").and_then(Value::as_str) {
            Some("error") => StreamEvent::Terminal(AnalysisResult::Error {
                friendly_message: get_string(final_result, "message", DEFAULT_ERROR_MESSAGE),
                session_id: get_string(final_result, "session_id", UNKNOWN_SESSION),
            }),
            Some("legal_analysis") => StreamEvent::Terminal(normalize_legal_result(final_result)),
            Some("casual_response") => StreamEvent::Terminal(AnalysisResult::Error {
                friendly_message: get_string(final_result, "message", DEFAULT_CASUAL_MESSAGE),
                session_id: get_string(final_result, "session_id", UNKNOWN_SESSION),
            }),
            _ => StreamEvent::Ignore,
        };
    }

    if value.get("step").is_some_and(Value::is_string) {
        return StreamEvent::Progress(normalize_progress(value));
    }

    StreamEvent::Ignore
}
