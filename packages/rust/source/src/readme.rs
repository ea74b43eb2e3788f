//! README leaderboard table parsing.
//!
//! The upstream README embeds one or more markdown pipe tables. We pick the
//! first table whose header row has a model-name column and at least one
//! column that looks like a benchmark, then emit one raw record per data
//! row, keeping every non-name cell as a candidate score field.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument};

use benchbrief_shared::{BenchbriefError, RawRecord, Result, SourceConfig};

use crate::FetchOutcome;

/// Header aliases for the model-name column.
const NAME_ALIASES: &[&str] = &["name", "model", "model name"];

/// Header tokens that mark a column as benchmark-like, used only to choose
/// which table is the leaderboard.
const SCORE_HINTS: &[&str] = &[
    "humaneval",
    "aime",
    "gpqa",
    "mmlu",
    "mmmu",
    "math",
    "gsm8k",
    "code",
    "knowledge",
    "multimodal",
];

/// Fetch the README and parse its leaderboard table.
#[instrument(skip_all, fields(url = %config.readme_url))]
pub async fn fetch(client: &Client, config: &SourceConfig) -> Result<FetchOutcome> {
    let response =
        crate::get_with_retry(client, &config.readme_url, None, config.retries).await?;

    let body = response
        .text()
        .await
        .map_err(|e| BenchbriefError::Network(format!("{}: {e}", config.readme_url)))?;

    info!(bytes = body.len(), "fetched README");

    let records = parse_leaderboard(&body)?;
    info!(rows = records.len(), "parsed leaderboard table");

    Ok(FetchOutcome {
        records,
        files_scanned: 1,
    })
}

/// Parse the markdown text into raw records.
///
/// Fails when no table can be identified as the leaderboard; a README
/// without a usable table means the run has nothing to report.
pub fn parse_leaderboard(markdown: &str) -> Result<Vec<RawRecord>> {
    let tables = find_tables(markdown);
    debug!(tables = tables.len(), "markdown tables found");

    let table = tables
        .into_iter()
        .find(|t| is_leaderboard(t))
        .ok_or_else(|| {
            BenchbriefError::parse("no leaderboard table found in README markdown")
        })?;

    let header: Vec<String> = split_cells(&table[0]);
    let name_idx = name_column(&header).ok_or_else(|| {
        BenchbriefError::parse("leaderboard table has no model-name column")
    })?;

    let mut records = Vec::new();
    for line in &table[2..] {
        let cells = split_cells(line);
        if cells.len() != header.len() {
            debug!(line = %line, "skipping malformed table row");
            continue;
        }

        let model = cells[name_idx].clone();
        let fields: Vec<(String, Value)> = header
            .iter()
            .zip(cells.iter())
            .enumerate()
            .filter(|(i, (_, cell))| *i != name_idx && !cell.is_empty())
            .map(|(_, (head, cell))| (head.clone(), Value::String(cell.clone())))
            .collect();

        records.push(RawRecord { model, fields });
    }

    Ok(records)
}

/// Collect runs of consecutive pipe-table lines. A table is a line starting
/// with `|` immediately followed by a separator row (`|---|---|`).
fn find_tables(markdown: &str) -> Vec<Vec<String>> {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut tables = Vec::new();
    let mut i = 0;

    while i + 1 < lines.len() {
        if is_table_line(lines[i]) && is_separator_line(lines[i + 1]) {
            let mut buf = Vec::new();
            let mut j = i;
            while j < lines.len() && is_table_line(lines[j]) {
                buf.push(lines[j].to_string());
                j += 1;
            }
            tables.push(buf);
            i = j;
        } else {
            i += 1;
        }
    }

    tables
}

fn is_table_line(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

fn is_separator_line(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    !compact.is_empty() && compact.chars().all(|c| matches!(c, '|' | '-' | ':'))
}

/// Split one table line into trimmed cells.
fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_start_matches('|')
        .trim_end_matches('|')
        .split('|')
        .map(|c| c.trim().to_string())
        .collect()
}

/// A table is the leaderboard when it has a name column and at least one
/// benchmark-like header.
fn is_leaderboard(table: &[String]) -> bool {
    if table.len() < 3 {
        return false;
    }
    let header = split_cells(&table[0]);
    name_column(&header).is_some()
        && header.iter().any(|h| {
            let lower = h.to_lowercase();
            SCORE_HINTS.iter().any(|hint| lower.contains(hint))
        })
}

/// Index of the model-name column, by header alias.
fn name_column(header: &[String]) -> Option<usize> {
    header
        .iter()
        .position(|h| NAME_ALIASES.contains(&h.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# LLM Leaderboard

Some intro text.

| Feature | Supported |
|---------|-----------|
| Vision  | yes       |

## Scores

| Model | HumanEval | AIME 2024 | GPQA |
|-------|-----------|-----------|------|
| Model A | 93.2% | 81.0% | 67.4% |
| Model B | 87%   |       | 0.71 |
| Model C | —     | 91.5% | n/a  |
";

    #[test]
    fn picks_the_score_table_not_the_first() {
        let records = parse_leaderboard(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].model, "Model A");
        assert_eq!(records[0].fields.len(), 3);
    }

    #[test]
    fn empty_cells_are_omitted() {
        let records = parse_leaderboard(SAMPLE).unwrap();
        let b = &records[1];
        assert_eq!(b.model, "Model B");
        let fields: Vec<&str> = b.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(fields, ["HumanEval", "GPQA"]);
    }

    #[test]
    fn dash_cells_are_kept_for_the_extractor_to_reject() {
        let records = parse_leaderboard(SAMPLE).unwrap();
        let c = &records[2];
        assert!(c.fields.iter().any(|(k, _)| k == "HumanEval"));
    }

    #[test]
    fn no_table_is_a_parse_error() {
        let err = parse_leaderboard("# Nothing here\n\nJust prose.").unwrap_err();
        assert!(matches!(err, BenchbriefError::Parse { .. }));
    }

    #[test]
    fn table_without_name_column_is_skipped() {
        let md = "\
| HumanEval | GPQA |
|-----------|------|
| 93% | 67% |
";
        assert!(parse_leaderboard(md).is_err());
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let md = "\
| Model | HumanEval |
|-------|-----------|
| A | 93% |
| broken row with no pipe structure | x | y |
| B | 87% |
";
        let records = parse_leaderboard(md).unwrap();
        let models: Vec<&str> = records.iter().map(|r| r.model.as_str()).collect();
        assert_eq!(models, ["A", "B"]);
    }

    #[test]
    fn separator_detection() {
        assert!(is_separator_line("|---|---|"));
        assert!(is_separator_line("| :--- | ---: |"));
        assert!(!is_separator_line("| Model | Score |"));
        assert!(!is_separator_line(""));
    }

    #[tokio::test]
    async fn fetch_parses_mock_readme() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/README.md"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let config = SourceConfig {
            readme_url: format!("{}/README.md", server.uri()),
            timeout_secs: 5,
            ..SourceConfig::default()
        };
        let client = crate::build_client(&config).unwrap();
        let outcome = fetch(&client, &config).await.unwrap();
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.records.len(), 3);
    }

    #[tokio::test]
    async fn fetch_failure_aborts() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/README.md"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = SourceConfig {
            readme_url: format!("{}/README.md", server.uri()),
            timeout_secs: 5,
            ..SourceConfig::default()
        };
        let client = crate::build_client(&config).unwrap();
        let err = fetch(&client, &config).await.unwrap_err();
        assert!(matches!(err, BenchbriefError::Network(_)));
    }
}
