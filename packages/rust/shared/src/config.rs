//! Application configuration for benchbrief.
//!
//! User config lives at `~/.benchbrief/benchbrief.toml`.
//! Credentials are never stored in the file; the config names the
//! environment variables that hold them.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{BenchbriefError, Result};
use crate::types::Category;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "benchbrief.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".benchbrief";

// ---------------------------------------------------------------------------
// Config structs (matching benchbrief.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Extraction, categorization, and ranking settings.
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Telegram delivery settings.
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Fetch mode: "readme" (leaderboard table) or "models" (per-model JSON).
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Raw README URL for `readme` mode.
    #[serde(default = "default_readme_url")]
    pub readme_url: String,

    /// Repository owner for `models` mode.
    #[serde(default = "default_repo_owner")]
    pub repo_owner: String,

    /// Repository name for `models` mode.
    #[serde(default = "default_repo_name")]
    pub repo_name: String,

    /// Branch for `models` mode.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// GitHub API base URL for `models` mode (overridable for tests).
    #[serde(default = "default_api_base_github")]
    pub api_base: String,

    /// Raw content base URL for `models` mode (overridable for tests).
    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// Name of the env var holding an optional GitHub token.
    #[serde(default = "default_github_token_env")]
    pub github_token_env: String,

    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry attempts for rate-limited or 5xx responses.
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            readme_url: default_readme_url(),
            repo_owner: default_repo_owner(),
            repo_name: default_repo_name(),
            branch: default_branch(),
            api_base: default_api_base_github(),
            raw_base: default_raw_base(),
            github_token_env: default_github_token_env(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

fn default_mode() -> String {
    "readme".into()
}
fn default_readme_url() -> String {
    "https://raw.githubusercontent.com/JonathanChavezTamales/llm-leaderboard/main/README.md".into()
}
fn default_repo_owner() -> String {
    "JonathanChavezTamales".into()
}
fn default_repo_name() -> String {
    "llm-leaderboard".into()
}
fn default_branch() -> String {
    "main".into()
}
fn default_api_base_github() -> String {
    "https://api.github.com".into()
}
fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".into()
}
fn default_github_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_retries() -> u32 {
    4
}

/// `[summary]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// How many entries to keep per category.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Regex for model names to exclude (overridden by the env var below).
    #[serde(default)]
    pub exclude_pattern: Option<String>,

    /// Name of the env var that overrides `exclude_pattern`.
    #[serde(default = "default_exclude_env")]
    pub exclude_pattern_env: String,

    /// Keyword overrides per category. Missing categories use built-ins.
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            exclude_pattern: None,
            exclude_pattern_env: default_exclude_env(),
            keywords: KeywordsConfig::default(),
        }
    }
}

fn default_top_n() -> usize {
    5
}
fn default_exclude_env() -> String {
    "EXCLUDE_REGEX".into()
}

/// `[summary.keywords]` — per-category keyword overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default)]
    pub coding: Vec<String>,
    #[serde(default)]
    pub math: Vec<String>,
    #[serde(default)]
    pub reasoning: Vec<String>,
}

impl SummaryConfig {
    /// Resolve the keyword list for a category (config override or built-in).
    pub fn keywords_for(&self, category: Category) -> Vec<String> {
        let configured = match category {
            Category::Coding => &self.keywords.coding,
            Category::Math => &self.keywords.math,
            Category::Reasoning => &self.keywords.reasoning,
        };
        if configured.is_empty() {
            category
                .default_keywords()
                .iter()
                .map(|k| k.to_string())
                .collect()
        } else {
            configured.clone()
        }
    }

    /// Resolve the model-name exclusion regex, env var winning over config.
    pub fn exclude_regex(&self) -> Result<Option<Regex>> {
        let pattern = match std::env::var(&self.exclude_pattern_env) {
            Ok(p) if !p.is_empty() => Some(p),
            _ => self.exclude_pattern.clone(),
        };
        match pattern {
            Some(p) => {
                let re = Regex::new(&p).map_err(|e| {
                    BenchbriefError::config(format!("invalid exclude pattern '{p}': {e}"))
                })?;
                Ok(Some(re))
            }
            None => Ok(None),
        }
    }
}

/// `[telegram]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Name of the env var holding the bot token (never store the token itself).
    #[serde(default = "default_bot_token_env")]
    pub bot_token_env: String,

    /// Name of the env var holding the destination chat id.
    #[serde(default = "default_chat_id_env")]
    pub chat_id_env: String,

    /// Bot API base URL (overridable for tests).
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Telegram parse mode for the message text.
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,

    /// Chunk size limit in characters, kept under Telegram's 4096 cap.
    #[serde(default = "default_message_limit")]
    pub message_limit: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token_env: default_bot_token_env(),
            chat_id_env: default_chat_id_env(),
            api_base: default_api_base(),
            parse_mode: default_parse_mode(),
            message_limit: default_message_limit(),
        }
    }
}

fn default_bot_token_env() -> String {
    "TELEGRAM_BOT_TOKEN".into()
}
fn default_chat_id_env() -> String {
    "TELEGRAM_CHAT_ID".into()
}
fn default_api_base() -> String {
    "https://api.telegram.org".into()
}
fn default_parse_mode() -> String {
    "Markdown".into()
}
fn default_message_limit() -> usize {
    3800
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolved Telegram credentials, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub bot_token: String,
    pub chat_id: String,
}

/// Read both Telegram credentials from the env vars named in config.
///
/// Missing or empty credentials are a fatal config error, detected before
/// any network traffic happens.
pub fn resolve_credentials(config: &TelegramConfig) -> Result<Credentials> {
    let bot_token = require_env(&config.bot_token_env)?;
    let chat_id = require_env(&config.chat_id_env)?;
    Ok(Credentials { bot_token, chat_id })
}

fn require_env(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(BenchbriefError::config(format!(
            "{var_name} is not set. Export it before running benchbrief."
        ))),
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.benchbrief/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BenchbriefError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.benchbrief/benchbrief.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BenchbriefError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BenchbriefError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BenchbriefError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BenchbriefError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BenchbriefError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
