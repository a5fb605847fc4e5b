//! Terminal rendering for progress updates, result cards, and history.

use lexstream_core::{AnalysisResult, ProgressStatus, ProgressUpdate, RiskItem, RiskLevel};
use lexstream_store::AnalysisRecord;
use lexstream_translate::AnalysisTranslation;

const RULE: &str = "────────────────────────────────────────────────────────";

fn status_tag(status: ProgressStatus) -> &'static str {
    match status {
        ProgressStatus::Processing => "…",
        ProgressStatus::Completed => "✓",
        ProgressStatus::Failed => "✗",
    }
}

fn level_tag(level: RiskLevel) -> String {
    level.as_str().to_uppercase()
}

/// One progress line, e.g. `  ✓ [100%] Extracting — done`.
pub fn render_progress(update: &ProgressUpdate) {
    let mut line = format!(
        "  {} [{:>3}%] {}",
        status_tag(update.status),
        update.progress,
        update.step
    );
    if !update.message.is_empty() {
        line.push_str(" — ");
        line.push_str(&update.message);
    }
    println!("{line}");
}

fn render_risk(index: usize, risk: &RiskItem) {
    println!("  {}. [{}] {}", index + 1, level_tag(risk.level), risk.category);
    if !risk.description.is_empty() {
        println!("     {}", risk.description);
    }
    if !risk.recommendation.is_empty() {
        println!("     → {}", risk.recommendation);
    }
    if !risk.clause_reference.is_empty() {
        println!("     clause {}", risk.clause_reference);
    }
}

/// The full result card, or the error message for failed runs.
pub fn render_result(result: &AnalysisResult) {
    match result {
        AnalysisResult::Error {
            friendly_message, ..
        } => {
            println!("\n{RULE}");
            println!("ANALYSIS FAILED");
            println!("{RULE}");
            println!("{friendly_message}");
        }
        AnalysisResult::LegalAnalysis {
            document_info,
            analysis,
            friendly_message,
            ..
        } => {
            println!("\n{RULE}");
            println!("DOCUMENT  {}", document_info.filename);
            println!(
                "          {} words · ~{} pages · ~{} min read",
                document_info.word_count,
                document_info.estimated_pages,
                document_info.estimated_read_time
            );
            println!("{RULE}");
            println!("SUMMARY");
            println!("{}", analysis.summary);
            if !analysis.risks.is_empty() {
                println!("\nRISKS ({})", analysis.risks.len());
                for (i, risk) in analysis.risks.iter().enumerate() {
                    render_risk(i, risk);
                }
            }
            println!("\nVERDICT");
            println!("{}", analysis.verdict);
            println!("\n{friendly_message}");
            println!("\n{}", analysis.disclaimer);
        }
    }
}

/// Render the translated bundle under its own heading.
pub fn render_translation(translation: &AnalysisTranslation, target: &str) {
    println!("\n{RULE}");
    println!("TRANSLATION ({target}, via {})", translation.method);
    println!("{RULE}");
    println!("SUMMARY");
    println!("{}", translation.summary);
    if !translation.risks.is_empty() {
        println!("\nRISKS");
        for (i, risk) in translation.risks.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, risk.level, risk.category);
            if !risk.description.is_empty() {
                println!("     {}", risk.description);
            }
            if !risk.recommendation.is_empty() {
                println!("     → {}", risk.recommendation);
            }
        }
    }
    println!("\nVERDICT");
    println!("{}", translation.verdict);
}

/// Stored history, oldest first.
pub fn render_history(records: &[AnalysisRecord]) {
    if records.is_empty() {
        println!("no stored analyses");
        return;
    }
    for record in records {
        println!(
            "{}  {}  ({} risks)",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.document_name,
            record.risks.len()
        );
        println!("    {}", record.verdict);
    }
}
