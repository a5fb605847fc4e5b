//! The durable history record written once per successful analysis run.

use chrono::{DateTime, Utc};
use lexstream_core::{Analysis, RiskItem};
use serde::{Deserialize, Serialize};

/// One persisted analysis, keyed by `(user_id, created_at)`.
///
/// This is a longer-lived entity than the run state: it survives the run and
/// is written at most once per run, by the background collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub user_id: String,
    pub document_name: String,
    pub document_type: String,
    pub summary: String,
    pub risks: Vec<RiskItem>,
    pub verdict: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Build a record from a normalised analysis body.
    pub fn from_analysis(user_id: &str, document_name: &str, analysis: Analysis) -> Self {
        Self {
            user_id: user_id.to_string(),
            document_name: document_name.to_string(),
            document_type: "General".to_string(),
            summary: analysis.summary,
            risks: analysis.risks,
            verdict: analysis.verdict,
            created_at: Utc::now(),
        }
    }
}
