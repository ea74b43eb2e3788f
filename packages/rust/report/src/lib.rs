//! Report rendering: ranked category lists to a short Telegram-ready text.
//!
//! One section per category in fixed order. Empty categories render a
//! placeholder line instead of disappearing, so a quiet day still reads as
//! "no data" rather than a truncated report. Long reports are split into
//! chunks under the configured limit, repeating the header on each chunk.

use chrono::NaiveDate;

use benchbrief_shared::CategorySummary;

/// Placeholder line for a category with no matching records.
const EMPTY_SECTION: &str = "  • no data";

/// Footer crediting the upstream data source.
const SOURCE_LINE: &str =
    "Source: llm-stats.com • Data repo: github.com/JonathanChavezTamales/llm-leaderboard";

/// Run metadata rendered into the report header and footer.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    /// Date the digest was generated.
    pub date: NaiveDate,
    /// Number of models that produced at least one usable score.
    pub models_scanned: usize,
    /// Number of upstream files fetched.
    pub files_scanned: usize,
}

/// Render the full report text.
pub fn render(summaries: &[CategorySummary], meta: &ReportMeta) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!(
        "📊 LLM Stats — Daily Summary ({})",
        meta.date.format("%Y-%m-%d")
    ));
    lines.push(format!("Models scanned: {}", meta.models_scanned));
    lines.push(String::new());

    for summary in summaries {
        lines.push(format!("— {}:", summary.category.label()));
        if summary.entries.is_empty() {
            lines.push(EMPTY_SECTION.to_string());
        } else {
            for (i, entry) in summary.entries.iter().enumerate() {
                lines.push(format!(
                    "  {}. {}: {}",
                    i + 1,
                    entry.model,
                    format_percent(entry.score)
                ));
            }
        }
        lines.push(String::new());
    }

    lines.push(SOURCE_LINE.to_string());
    lines.push(format!("_scanned files: {}_", meta.files_scanned));

    lines.join("\n")
}

/// Format a unit-interval score as a percentage with one decimal place.
pub fn format_percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Split a report into chunks no longer than `limit` characters.
///
/// Splits at blank-line boundaries and repeats the header line on every
/// continuation chunk. A report already under the limit comes back as a
/// single chunk.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let blocks: Vec<&str> = text.split("\n\n").collect();
    let header = blocks.first().copied().unwrap_or_default();

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();

    for block in &blocks {
        let candidate_len = current.chars().count() + block.chars().count() + 2;
        if !current.is_empty() && candidate_len > limit {
            chunks.push(current.trim_end().to_string());
            current = header.to_string();
            // The header block itself is already in every chunk
            if *block == header {
                continue;
            }
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(block);
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim_end().to_string());
    }

    chunks
}
