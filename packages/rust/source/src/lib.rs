//! Fetching raw benchmark records from the upstream leaderboard repository.
//!
//! Two source modes, selected by config:
//! - `readme`: one GET of the repository README, parsed as a markdown
//!   leaderboard table.
//! - `models`: list `models/*.json` blobs via the git-trees API and fetch
//!   each file, flattening nested scores to dotted key paths.
//!
//! Both modes share the same HTTP plumbing: explicit user agent, timeout,
//! optional bearer token, and bounded exponential backoff on rate limits
//! and server errors.

pub mod readme;
pub mod repo;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use benchbrief_shared::{BenchbriefError, RawRecord, Result, SourceConfig};

/// User-Agent string for all outbound requests.
const USER_AGENT: &str = concat!("benchbrief/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// FetchOutcome
// ---------------------------------------------------------------------------

/// Raw records plus fetch bookkeeping for the report footer.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// One raw record per model row or model file.
    pub records: Vec<RawRecord>,
    /// Number of upstream resources fetched (1 for README mode).
    pub files_scanned: usize,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Fetch raw records using the mode selected in config.
#[instrument(skip_all, fields(mode = %config.mode))]
pub async fn fetch_records(config: &SourceConfig) -> Result<FetchOutcome> {
    let client = build_client(config)?;

    match config.mode.as_str() {
        "readme" => readme::fetch(&client, config).await,
        "models" => repo::fetch(&client, config).await,
        other => Err(BenchbriefError::validation(format!(
            "unknown source mode '{other}': expected 'readme' or 'models'"
        ))),
    }
}

// ---------------------------------------------------------------------------
// HTTP plumbing
// ---------------------------------------------------------------------------

/// Build a reqwest client with appropriate settings.
pub fn build_client(config: &SourceConfig) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| BenchbriefError::Network(format!("failed to build HTTP client: {e}")))
}

/// Whether a status is worth retrying (rate limits and server errors).
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::FORBIDDEN
        || status.is_server_error()
}

/// GET a URL with bounded exponential backoff.
///
/// Retries on 429, 403, and 5xx up to `retries` attempts, sleeping
/// `2^attempt` seconds between tries. Any other non-2xx fails immediately.
pub(crate) async fn get_with_retry(
    client: &Client,
    url: &str,
    bearer: Option<&str>,
    retries: u32,
) -> Result<reqwest::Response> {
    let attempts = retries.max(1);

    for attempt in 0..attempts {
        let mut request = client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BenchbriefError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status.is_success() {
            debug!(%url, attempt, "fetched");
            return Ok(response);
        }

        if is_retryable(status) && attempt + 1 < attempts {
            let backoff = Duration::from_secs(1u64 << attempt);
            warn!(%url, %status, backoff_secs = backoff.as_secs(), "retrying");
            tokio::time::sleep(backoff).await;
            continue;
        }

        return Err(BenchbriefError::Network(format!("{url}: HTTP {status}")));
    }

    Err(BenchbriefError::Network(format!(
        "{url}: failed after {attempts} attempts"
    )))
}

/// Resolve the optional GitHub token from the env var named in config.
pub(crate) fn github_token(config: &SourceConfig) -> Option<String> {
    match std::env::var(&config.github_token_env) {
        Ok(token) if !token.is_empty() => {
            info!("using GitHub token from environment");
            Some(token)
        }
        _ => None,
    }
}
