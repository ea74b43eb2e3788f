//! Per-model JSON fetching via the GitHub git-trees API.
//!
//! Lists `models/*.json` blobs on the configured branch, fetches each raw
//! file, and flattens nested score objects to dotted key paths so keys like
//! `benchmarks.HumanEval.pass@1` keep their benchmark names for keyword
//! matching downstream.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use benchbrief_shared::{BenchbriefError, RawRecord, Result, SourceConfig};

use crate::FetchOutcome;

/// Top-level containers that usually hold benchmark scores. When none of
/// them is present the whole document is flattened instead.
const SCORE_CONTAINERS: &[&str] = &["benchmarks", "evals", "scores", "results", "metrics"];

/// One entry in the git-trees listing.
#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    item_type: String,
}

/// Response shape of `GET /repos/{owner}/{repo}/git/trees/{branch}`.
#[derive(Debug, Deserialize)]
struct TreeResponse {
    tree: Vec<TreeItem>,
}

/// Fetch all model files and produce one raw record per file.
///
/// A failed tree listing aborts the run; individual file failures are
/// logged and skipped.
#[instrument(skip_all, fields(owner = %config.repo_owner, repo = %config.repo_name))]
pub async fn fetch(client: &Client, config: &SourceConfig) -> Result<FetchOutcome> {
    let token = crate::github_token(config);
    let paths = list_model_paths(client, config, token.as_deref()).await?;
    info!(files = paths.len(), "model files listed");

    let mut records = Vec::new();
    let mut files_scanned = 0usize;

    for path in &paths {
        let url = format!(
            "{}/{}/{}/{}/{path}",
            config.raw_base, config.repo_owner, config.repo_name, config.branch
        );

        let json: Value = match crate::get_with_retry(client, &url, token.as_deref(), config.retries)
            .await
        {
            Ok(response) => match response.json().await {
                Ok(json) => json,
                Err(e) => {
                    warn!(%path, error = %e, "failed to parse model file, skipping");
                    continue;
                }
            },
            Err(e) => {
                warn!(%path, error = %e, "failed to fetch model file, skipping");
                continue;
            }
        };

        files_scanned += 1;
        records.push(model_record(path, &json));
    }

    info!(files_scanned, models = records.len(), "model files fetched");

    Ok(FetchOutcome {
        records,
        files_scanned,
    })
}

/// List `models/*.json` blob paths on the configured branch.
async fn list_model_paths(
    client: &Client,
    config: &SourceConfig,
    token: Option<&str>,
) -> Result<Vec<String>> {
    let url = format!(
        "{}/repos/{}/{}/git/trees/{}?recursive=1",
        config.api_base, config.repo_owner, config.repo_name, config.branch
    );

    let response = crate::get_with_retry(client, &url, token, config.retries).await?;
    let tree: TreeResponse = response
        .json()
        .await
        .map_err(|e| BenchbriefError::parse(format!("unexpected tree response: {e}")))?;

    Ok(tree
        .tree
        .into_iter()
        .filter(|item| {
            item.item_type == "blob"
                && item.path.starts_with("models/")
                && item.path.ends_with(".json")
        })
        .map(|item| item.path)
        .collect())
}

/// Build a raw record from one model document.
fn model_record(path: &str, json: &Value) -> RawRecord {
    RawRecord {
        model: resolve_name(path, json),
        fields: flatten_scores(json),
    }
}

/// Resolve a display name: `name`, then `id`, then the file stem.
fn resolve_name(path: &str, json: &Value) -> String {
    for key in ["name", "id"] {
        if let Some(name) = json.get(key).and_then(Value::as_str) {
            if !name.is_empty() {
                return name.to_string();
            }
        }
    }
    path.rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".json")
        .to_string()
}

/// Flatten the score containers (or the whole document) to dotted paths.
fn flatten_scores(json: &Value) -> Vec<(String, Value)> {
    let mut containers: Vec<&Value> = SCORE_CONTAINERS
        .iter()
        .filter_map(|key| json.get(*key))
        .filter(|v| v.is_object() || v.is_array())
        .collect();

    if containers.is_empty() {
        containers.push(json);
    }

    let mut out = Vec::new();
    for container in containers {
        flatten_value(container, "", &mut out);
    }
    out
}

/// Recursive flattening. Keys are lowercased so keyword matching sees the
/// full dotted path.
fn flatten_value(value: &Value, path: &str, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let next = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_value(child, &next, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                flatten_value(child, &format!("{path}[{i}]"), out);
            }
        }
        leaf => {
            if !path.is_empty() {
                out.push((path.to_lowercase(), leaf.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_benchmarks_with_full_paths() {
        let doc = json!({
            "name": "Model A",
            "benchmarks": {
                "HumanEval": { "pass@1": 0.921 },
                "AIME-2024": "81%"
            }
        });
        let fields = flatten_scores(&doc);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"humaneval.pass@1"));
        assert!(keys.contains(&"aime-2024"));
    }

    #[test]
    fn flattens_whole_document_when_no_container() {
        let doc = json!({ "humaneval": 0.9, "meta": { "release": "2025" } });
        let fields = flatten_scores(&doc);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"humaneval"));
        assert!(keys.contains(&"meta.release"));
    }

    #[test]
    fn arrays_get_indexed_paths() {
        let doc = json!({ "results": [ { "gpqa": 0.6 }, { "gpqa": 0.7 } ] });
        let fields = flatten_scores(&doc);
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"[0].gpqa"));
        assert!(keys.contains(&"[1].gpqa"));
    }

    #[test]
    fn name_resolution_falls_back_to_file_stem() {
        assert_eq!(
            resolve_name("models/acme-1.json", &json!({ "name": "Acme One" })),
            "Acme One"
        );
        assert_eq!(
            resolve_name("models/acme-1.json", &json!({ "id": "acme-1" })),
            "acme-1"
        );
        assert_eq!(resolve_name("models/acme-1.json", &json!({})), "acme-1");
    }

    #[tokio::test]
    async fn fetch_lists_and_flattens_model_files() {
        let server = wiremock::MockServer::start().await;

        let tree = json!({
            "tree": [
                { "path": "models/a.json", "type": "blob" },
                { "path": "models/b.json", "type": "blob" },
                { "path": "models/readme.md", "type": "blob" },
                { "path": "models", "type": "tree" }
            ]
        });

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/repos/o/r/git/trees/main"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(&tree))
            .mount(&server)
            .await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/o/r/main/models/a.json"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "name": "Model A",
                "benchmarks": { "humaneval": { "pass@1": 0.93 } }
            })))
            .mount(&server)
            .await;

        // b.json is unreachable and must be skipped, not fatal
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/o/r/main/models/b.json"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = SourceConfig {
            mode: "models".into(),
            repo_owner: "o".into(),
            repo_name: "r".into(),
            branch: "main".into(),
            api_base: server.uri(),
            raw_base: server.uri(),
            github_token_env: "BB_TEST_NO_GH_TOKEN".into(),
            timeout_secs: 5,
            retries: 1,
            ..SourceConfig::default()
        };

        let client = crate::build_client(&config).unwrap();
        let outcome = fetch(&client, &config).await.unwrap();
        assert_eq!(outcome.files_scanned, 1);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].model, "Model A");
        assert_eq!(outcome.records[0].fields[0].0, "humaneval.pass@1");
    }

    #[tokio::test]
    async fn tree_listing_failure_is_fatal() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/repos/o/r/git/trees/main"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let config = SourceConfig {
            mode: "models".into(),
            repo_owner: "o".into(),
            repo_name: "r".into(),
            api_base: server.uri(),
            raw_base: server.uri(),
            github_token_env: "BB_TEST_NO_GH_TOKEN".into(),
            timeout_secs: 5,
            retries: 1,
            ..SourceConfig::default()
        };

        let client = crate::build_client(&config).unwrap();
        let err = fetch(&client, &config).await.unwrap_err();
        assert!(matches!(err, BenchbriefError::Network(_)));
    }
}
