//! Wire-facing data model for the analysis stream.
//!
//! Everything here is the *strict* shape: untrusted backend JSON only reaches
//! these types through [`crate::normalize`], which defaults every missing or
//! mistyped field instead of failing.

use serde::{Deserialize, Serialize};

/// Disclaimer attached to every analysis when the backend omits one.
pub const DEFAULT_DISCLAIMER: &str =
    "This analysis is for informational purposes only and does not constitute legal advice.";

/// Friendly message attached to a successful analysis when the backend omits one.
pub const DEFAULT_FRIENDLY_MESSAGE: &str =
    "Your document analysis is complete. Please review the report below.";

/// Message carried by an [`AnalysisResult::Error`] when the backend omits one.
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred during analysis.";

/// Message carried by a casual (non-document) reply when the backend omits one.
pub const DEFAULT_CASUAL_MESSAGE: &str = "Response generated.";

/// Session id used when the backend does not supply one.
pub const UNKNOWN_SESSION: &str = "unknown";

/// Severity of a single risk finding.
///
/// Closed whitelist: anything the backend sends outside these five values
/// collapses to [`RiskLevel::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Case-insensitive parse against the closed whitelist.
    ///
    /// This is a strict whitelist, not a best-effort guess: `"catastrophic"`
    /// is [`RiskLevel::Unknown`], not [`RiskLevel::Critical`].
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

/// One risk finding within an analysis. Order as received is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskItem {
    pub description: String,
    pub level: RiskLevel,
    pub category: String,
    pub recommendation: String,
    pub clause_reference: String,
}

/// Metadata about the analysed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub filename: String,
    pub word_count: u64,
    pub estimated_pages: u64,
    pub estimated_read_time: u64,
    /// ISO-8601 timestamp; defaults to the time of normalisation.
    pub processed_at: String,
}

/// The analysis body: summary, ordered risks, verdict, disclaimer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    pub risks: Vec<RiskItem>,
    pub verdict: String,
    pub disclaimer: String,
}

/// Terminal outcome of one analysis run.
///
/// Casual (non-document) backend replies are carried as [`Self::Error`] with
/// the casual message: there is no dedicated chat rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalysisResult {
    #[serde(rename = "legal_analysis")]
    LegalAnalysis {
        document_info: DocumentInfo,
        analysis: Analysis,
        friendly_message: String,
        session_id: String,
    },
    #[serde(rename = "error")]
    Error {
        friendly_message: String,
        session_id: String,
    },
}

impl AnalysisResult {
    pub fn session_id(&self) -> &str {
        match self {
            Self::LegalAnalysis { session_id, .. } | Self::Error { session_id, .. } => session_id,
        }
    }

    pub fn is_legal_analysis(&self) -> bool {
        matches!(self, Self::LegalAnalysis { .. })
    }
}

/// Status of one processing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Processing,
    Completed,
    Failed,
}

impl ProgressStatus {
    /// Unrecognised statuses default to `Processing`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            _ => Self::Processing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One in-progress step update. `step` is the identity key in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub step: String,
    pub status: ProgressStatus,
    pub message: String,
    /// Percentage, clamped to 0..=100.
    pub progress: u8,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
