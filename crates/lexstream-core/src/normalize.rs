//! Total normalisation of untrusted backend payloads.
//!
//! The backend's JSON is untyped at the wire level. Every field access here
//! is "optional, validate-or-default": nothing in this module ever fails, it
//! degrades to defaults. This is the single chokepoint between raw stream
//! payloads and both the UI state and persistent storage.

use chrono::Utc;
use serde_json::Value;

use crate::types::{
    Analysis, AnalysisResult, DEFAULT_DISCLAIMER, DEFAULT_FRIENDLY_MESSAGE, DocumentInfo,
    ProgressStatus, ProgressUpdate, RiskItem, RiskLevel, UNKNOWN_SESSION,
};

/// Fetch `key` as a string. Strings pass through, numbers are stringified,
/// anything else yields `fallback`. Non-object `value` yields `fallback`.
pub fn get_string(value: &Value, key: &str, fallback: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => fallback.to_string(),
    }
}

/// Fetch `key` as a non-negative integer. Only actual JSON numbers are
/// accepted; negatives and non-numbers collapse to 0.
pub fn get_count(value: &Value, key: &str) -> u64 {
    match value.get(key).and_then(Value::as_f64) {
        Some(n) if n.is_finite() && n > 0.0 => n as u64,
        _ => 0,
    }
}

/// Normalise a loose `document_info` payload, defaulting every field.
pub fn normalize_document_info(raw: &Value) -> DocumentInfo {
    DocumentInfo {
        filename: get_string(raw, "filename", "Unknown"),
        word_count: get_count(raw, "word_count"),
        estimated_pages: get_count(raw, "estimated_pages"),
        estimated_read_time: get_count(raw, "estimated_read_time"),
        processed_at: get_string(raw, "processed_at", &Utc::now().to_rfc3339()),
    }
}

/// Normalise one element of the `risks` array.
///
/// A non-object element becomes an all-empty item with an unknown level.
pub fn normalize_risk(raw: &Value) -> RiskItem {
    if !raw.is_object() {
        return RiskItem {
            description: String::new(),
            level: RiskLevel::Unknown,
            category: String::new(),
            recommendation: String::new(),
            clause_reference: String::new(),
        };
    }
    RiskItem {
        description: get_string(raw, "description", ""),
        level: RiskLevel::parse(&get_string(raw, "level", "unknown")),
        category: get_string(raw, "category", ""),
        recommendation: get_string(raw, "recommendation", ""),
        clause_reference: get_string(raw, "clause_reference", ""),
    }
}

/// Normalise a loose `analysis` payload. A `risks` field that is not an
/// array normalises to an empty sequence; order of elements is preserved.
pub fn normalize_analysis(raw: &Value) -> Analysis {
    let risks = raw
        .get("risks")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(normalize_risk).collect())
        .unwrap_or_default();
    Analysis {
        summary: get_string(raw, "summary", ""),
        risks,
        verdict: get_string(raw, "verdict", ""),
        disclaimer: get_string(raw, "disclaimer", DEFAULT_DISCLAIMER),
    }
}

/// Build a strict [`AnalysisResult::LegalAnalysis`] from a loose
/// `final_result` payload whose `type` is already known to be
/// `legal_analysis`.
pub fn normalize_legal_result(final_result: &Value) -> AnalysisResult {
    AnalysisResult::LegalAnalysis {
        document_info: normalize_document_info(
            final_result.get("document_info").unwrap_or(&Value::Null),
        ),
        analysis: normalize_analysis(final_result.get("analysis").unwrap_or(&Value::Null)),
        friendly_message: get_string(final_result, "friendly_message", DEFAULT_FRIENDLY_MESSAGE),
        session_id: get_string(final_result, "session_id", UNKNOWN_SESSION),
    }
}

/// Normalise a loose progress payload into a [`ProgressUpdate`].
///
/// `progress` is clamped to 0..=100; unknown statuses read as `processing`;
/// `details` survives only when it is an object.
pub fn normalize_progress(raw: &Value) -> ProgressUpdate {
    ProgressUpdate {
        step: get_string(raw, "step", ""),
        status: ProgressStatus::parse(&get_string(raw, "status", "processing")),
        message: get_string(raw, "message", ""),
        progress: get_count(raw, "progress").min(100) as u8,
        timestamp: get_string(raw, "timestamp", ""),
        details: raw.get("details").filter(|v| v.is_object()).cloned(),
    }
}
