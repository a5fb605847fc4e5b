//! Marker-delimited packing of an analysis for round-tripping through an
//! external translator.
//!
//! The verdict, summary, and every risk are joined into one string using
//! reserved marker tokens the translator is instructed to preserve. Unpacking
//! splits on the same markers in order; if any expected marker is missing
//! from the translated text, unpacking returns `None` and the caller shows
//! the original untranslated content instead of partial or misaligned text.

use lexstream_core::RiskItem;

pub const VERDICT_MARKER: &str = "__VERDICT__";
pub const SUMMARY_MARKER: &str = "__SUMMARY__";
pub const RISKS_MARKER: &str = "__RISKS__";
pub const RISK_START_MARKER: &str = "__RSTART__";
pub const RISK_END_MARKER: &str = "__REND__";

/// One risk as it comes back from the translator. All fields are free text —
/// including `level`, which the translator may have rendered into the target
/// language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedRisk {
    pub category: String,
    pub level: String,
    pub description: String,
    pub recommendation: String,
}

/// The unpacked translation bundle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslatedContent {
    pub verdict: String,
    pub summary: String,
    pub risks: Vec<TranslatedRisk>,
}

/// Pack verdict, summary, and risks into one marker-delimited string.
///
/// Sections are joined with blank lines to give the translator clear
/// paragraph separators.
pub fn pack_for_translation(verdict: &str, summary: &str, risks: &[RiskItem]) -> String {
    let mut parts: Vec<String> = vec![
        VERDICT_MARKER.to_string(),
        verdict.to_string(),
        String::new(),
        SUMMARY_MARKER.to_string(),
        summary.to_string(),
        String::new(),
        RISKS_MARKER.to_string(),
    ];

    for risk in risks {
        parts.push(RISK_START_MARKER.to_string());
        parts.push(format!("CATEGORY: {}", risk.category));
        parts.push(format!("LEVEL: {}", risk.level.as_str()));
        parts.push("DESCRIPTION:".to_string());
        parts.push(risk.description.clone());
        parts.push("RECOMMENDATION:".to_string());
        parts.push(risk.recommendation.clone());
        parts.push(RISK_END_MARKER.to_string());
    }

    parts.join("\n\n")
}

/// Inverse of [`pack_for_translation`], applied to the translated text.
///
/// Returns `None` when any of the verdict/summary/risks markers is missing —
/// the translator altered or dropped them and field boundaries are lost.
pub fn unpack_translated(translated: &str) -> Option<TranslatedContent> {
    let (_, after_verdict) = translated.split_once(VERDICT_MARKER)?;
    let (verdict, after_summary) = after_verdict.split_once(SUMMARY_MARKER)?;
    let (summary, risks_section) = after_summary.split_once(RISKS_MARKER)?;

    let mut content = TranslatedContent {
        verdict: verdict.trim().to_string(),
        summary: summary.trim().to_string(),
        risks: Vec::new(),
    };

    for block in risks_section
        .split(RISK_START_MARKER)
        .map(str::trim)
        .filter(|b| !b.is_empty())
    {
        let body = block
            .split(RISK_END_MARKER)
            .next()
            .unwrap_or_default()
            .trim();
        content.risks.push(parse_risk_block(body));
    }

    Some(content)
}

/// Line-oriented parse of one risk block.
///
/// `CATEGORY:`/`LEVEL:` take the remainder of their own line;
/// `DESCRIPTION:`/`RECOMMENDATION:` switch an accumulation mode that
/// collects the following lines until the next label.
fn parse_risk_block(body: &str) -> TranslatedRisk {
    enum Mode {
        None,
        Description,
        Recommendation,
    }

    let mut risk = TranslatedRisk::default();
    let mut mode = Mode::None;

    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let upper = line.to_uppercase();
        if upper.starts_with("CATEGORY:") {
            risk.category = after_label(line);
            mode = Mode::None;
        } else if upper.starts_with("LEVEL:") {
            risk.level = after_label(line);
            mode = Mode::None;
        } else if upper.starts_with("DESCRIPTION:") {
            mode = Mode::Description;
        } else if upper.starts_with("RECOMMENDATION:") {
            mode = Mode::Recommendation;
        } else {
            let target = match mode {
                Mode::Description => &mut risk.description,
                Mode::Recommendation => &mut risk.recommendation,
                Mode::None => continue,
            };
            if !target.is_empty() {
                target.push('\n');
            }
            target.push_str(line);
        }
    }

    risk
}

fn after_label(line: &str) -> String {
    line.split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexstream_core::RiskLevel;

    fn risk(category: &str, level: RiskLevel, description: &str, recommendation: &str) -> RiskItem {
        RiskItem {
            description: description.into(),
            level,
            category: category.into(),
            recommendation: recommendation.into(),
            clause_reference: "1.1".into(),
        }
    }

    #[test]
    fn pack_unpack_round_trip() {
        let risks = vec![
            risk("Liability", RiskLevel::High, "Unlimited exposure", "Add a cap"),
            risk("Termination", RiskLevel::Low, "Short notice period", "Extend to 30 days"),
        ];
        let packed = pack_for_translation("Do not sign", "A one-sided agreement", &risks);
        let content = unpack_translated(&packed).expect("markers intact");

        assert_eq!(content.verdict, "Do not sign");
        assert_eq!(content.summary, "A one-sided agreement");
        assert_eq!(content.risks.len(), 2);
        assert_eq!(content.risks[0].category, "Liability");
        assert_eq!(content.risks[0].level, "high");
        assert_eq!(content.risks[0].description, "Unlimited exposure");
        assert_eq!(content.risks[0].recommendation, "Add a cap");
        assert_eq!(content.risks[1].category, "Termination");
    }

    #[test]
    fn empty_risks_round_trip() {
        let packed = pack_for_translation("V", "S", &[]);
        let content = unpack_translated(&packed).unwrap();
        assert_eq!(content.verdict, "V");
        assert_eq!(content.summary, "S");
        assert!(content.risks.is_empty());
    }

    #[test]
    fn missing_summary_marker_fails_cleanly() {
        let packed = pack_for_translation("V", "S", &[]);
        let broken = packed.replace(SUMMARY_MARKER, "");
        assert_eq!(unpack_translated(&broken), None);
    }

    #[test]
    fn missing_verdict_marker_fails_cleanly() {
        let packed = pack_for_translation("V", "S", &[]);
        let broken = packed.replace(VERDICT_MARKER, "TRANSLATED AWAY");
        assert_eq!(unpack_translated(&broken), None);
    }

    #[test]
    fn missing_risks_marker_fails_cleanly() {
        let packed = pack_for_translation("V", "S", &[]);
        let broken = packed.replace(RISKS_MARKER, "");
        assert_eq!(unpack_translated(&broken), None);
    }

    #[test]
    fn multiline_description_is_accumulated() {
        let text = format!(
            "{VERDICT_MARKER}\nV\n{SUMMARY_MARKER}\nS\n{RISKS_MARKER}\n{RISK_START_MARKER}\n\
             CATEGORY: Data\nLEVEL: medium\nDESCRIPTION:\nline one\nline two\n\
             RECOMMENDATION:\nfix it\n{RISK_END_MARKER}"
        );
        let content = unpack_translated(&text).unwrap();
        assert_eq!(content.risks[0].description, "line one\nline two");
        assert_eq!(content.risks[0].recommendation, "fix it");
    }

    #[test]
    fn labels_are_matched_case_insensitively() {
        let text = format!(
            "{VERDICT_MARKER}\nV\n{SUMMARY_MARKER}\nS\n{RISKS_MARKER}\n{RISK_START_MARKER}\n\
             category: Privacy\nLevel: low\ndescription:\nd\n{RISK_END_MARKER}"
        );
        let content = unpack_translated(&text).unwrap();
        assert_eq!(content.risks[0].category, "Privacy");
        assert_eq!(content.risks[0].level, "low");
        assert_eq!(content.risks[0].description, "d");
    }

    #[test]
    fn translated_level_text_passes_through() {
        // The translator may render the level into the target language.
        let packed = pack_for_translation("V", "S", &[risk("c", RiskLevel::High, "d", "r")]);
        let translated = packed.replace("LEVEL: high", "LEVEL: زیادہ");
        let content = unpack_translated(&translated).unwrap();
        assert_eq!(content.risks[0].level, "زیادہ");
    }
}
