//! Translate a whole analysis in one round trip.

use lexstream_core::Analysis;
use tracing::warn;

use crate::markers::{TranslatedRisk, pack_for_translation, unpack_translated};
use crate::service::{TranslateRequest, Translator};

/// A translated (or fallen-back) rendering of an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTranslation {
    pub verdict: String,
    pub summary: String,
    pub risks: Vec<TranslatedRisk>,
    /// Name of the strategy that produced the text, or `"original"` when the
    /// markers did not survive and the untranslated content is shown.
    pub method: String,
}

fn original_content(analysis: &Analysis) -> Vec<TranslatedRisk> {
    analysis
        .risks
        .iter()
        .map(|r| TranslatedRisk {
            category: r.category.clone(),
            level: r.level.as_str().to_string(),
            description: r.description.clone(),
            recommendation: r.recommendation.clone(),
        })
        .collect()
}

/// Pack the analysis, run it through the strategy chain once, and unpack.
///
/// If the translator mangled the markers, the original text is returned
/// whole — never partial or misaligned content.
pub async fn translate_analysis(
    translator: &Translator,
    analysis: &Analysis,
    source: &str,
    target: &str,
) -> AnalysisTranslation {
    let packed = pack_for_translation(&analysis.verdict, &analysis.summary, &analysis.risks);
    let translation = translator
        .translate(&TranslateRequest {
            text: packed,
            source: source.to_string(),
            target: target.to_string(),
        })
        .await;

    match unpack_translated(&translation.text) {
        Some(content) => AnalysisTranslation {
            verdict: content.verdict,
            summary: content.summary,
            risks: content.risks,
            method: translation.method,
        },
        None => {
            warn!(
                method = %translation.method,
                "markers lost in translation; falling back to original text"
            );
            AnalysisTranslation {
                verdict: analysis.verdict.clone(),
                summary: analysis.summary.clone(),
                risks: original_content(analysis),
                method: "original".to_string(),
            }
        }
    }
}
