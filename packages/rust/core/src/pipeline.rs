//! End-to-end run pipeline: fetch → extract → categorize → rank → format → notify.
//!
//! Strictly linear, one execution per invocation. Fatal errors (fetch
//! failure, missing credentials, notify failure) propagate to the caller;
//! empty categories are not errors.

use std::time::{Duration, Instant};

use tracing::{info, instrument};

use benchbrief_notify::Notifier;
use benchbrief_report::ReportMeta;
use benchbrief_shared::{AppConfig, Credentials, Result, resolve_credentials};
use benchbrief_summary::CategoryKeywords;

/// Outcome of one pipeline run.
#[derive(Debug)]
pub struct RunReport {
    /// Upstream files fetched.
    pub files_scanned: usize,
    /// Raw model rows seen in the source.
    pub models_seen: usize,
    /// Usable records after extraction.
    pub records_extracted: usize,
    /// Messages delivered (0 on dry run).
    pub messages_sent: usize,
    /// The rendered report text (before chunking).
    pub text: String,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Run the pipeline, resolving Telegram credentials from the environment.
///
/// Credentials are checked before any network traffic so a misconfigured
/// scheduler run fails immediately.
pub async fn run(config: &AppConfig) -> Result<RunReport> {
    let credentials = resolve_credentials(&config.telegram)?;
    run_with_credentials(config, &credentials).await
}

/// Run the pipeline with already-resolved credentials.
///
/// When the report cannot be built, a best-effort failure notice is sent
/// to the same chat before the error propagates.
#[instrument(skip_all, fields(mode = %config.source.mode))]
pub async fn run_with_credentials(
    config: &AppConfig,
    credentials: &Credentials,
) -> Result<RunReport> {
    let start = Instant::now();
    let notifier = Notifier::new(&config.telegram, credentials)?;

    let mut report = match build_report(config).await {
        Ok(built) => built,
        Err(e) => {
            notifier.send_failure_notice(&e.to_string()).await;
            return Err(e);
        }
    };

    let chunks = benchbrief_report::split_message(&report.text, config.telegram.message_limit);
    report.messages_sent = notifier.send_all(&chunks).await?;
    report.elapsed = start.elapsed();

    info!(
        files_scanned = report.files_scanned,
        models_seen = report.models_seen,
        records = report.records_extracted,
        messages_sent = report.messages_sent,
        elapsed_ms = report.elapsed.as_millis(),
        "run complete"
    );

    Ok(report)
}

/// Build and render the report without sending anything.
pub async fn dry_run(config: &AppConfig) -> Result<RunReport> {
    let start = Instant::now();
    let mut report = build_report(config).await?;
    report.elapsed = start.elapsed();
    Ok(report)
}

/// Fetch, extract, categorize, rank, and render. Shared by run and dry run.
async fn build_report(config: &AppConfig) -> Result<RunReport> {
    // --- Fetch ---
    let outcome = benchbrief_source::fetch_records(&config.source).await?;
    let models_seen = outcome.records.len();
    info!(models_seen, files_scanned = outcome.files_scanned, "source fetched");

    // --- Extract ---
    let exclude = config.summary.exclude_regex()?;
    let records = benchbrief_summary::extract_all(&outcome.records, exclude.as_ref());
    info!(records = records.len(), "scores extracted");

    // --- Categorize and rank ---
    let keywords = CategoryKeywords::from_config(&config.summary);
    let buckets = benchbrief_summary::categorize(&records, &keywords);
    let summaries = benchbrief_summary::summarize(&buckets, config.summary.top_n);

    // --- Format ---
    let meta = ReportMeta {
        date: chrono::Utc::now().date_naive(),
        models_scanned: models_seen,
        files_scanned: outcome.files_scanned,
    };
    let text = benchbrief_report::render(&summaries, &meta);

    Ok(RunReport {
        files_scanned: outcome.files_scanned,
        models_seen,
        records_extracted: records.len(),
        messages_sent: 0,
        text,
        elapsed: Duration::ZERO,
    })
}
