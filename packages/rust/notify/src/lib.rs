//! Telegram Bot API delivery.
//!
//! One `sendMessage` POST per report chunk, no retry: a failed send fails
//! the run. A short best-effort failure notice can also be sent when the
//! pipeline itself dies after credentials were resolved.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument, warn};

use benchbrief_shared::{BenchbriefError, Credentials, Result, TelegramConfig};

/// User-Agent string for Bot API requests.
const USER_AGENT: &str = concat!("benchbrief/", env!("CARGO_PKG_VERSION"));

/// Request timeout for sends.
const SEND_TIMEOUT_SECS: u64 = 60;

/// Maximum length of the error text in a failure notice.
const FAILURE_NOTICE_LEN: usize = 350;

/// `sendMessage` request body.
#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

/// A configured Telegram destination.
pub struct Notifier {
    client: Client,
    api_base: String,
    bot_token: String,
    chat_id: String,
    parse_mode: String,
}

impl Notifier {
    /// Build a notifier from config and resolved credentials.
    pub fn new(config: &TelegramConfig, credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .map_err(|e| BenchbriefError::Notify(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            bot_token: credentials.bot_token.clone(),
            chat_id: credentials.chat_id.clone(),
            parse_mode: config.parse_mode.clone(),
        })
    }

    /// Send one message. Non-2xx or transport failure is a `Notify` error.
    ///
    /// Error messages never include the request URL, which embeds the token.
    #[instrument(skip_all, fields(chars = text.chars().count()))]
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text,
            parse_mode: &self.parse_mode,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BenchbriefError::Notify(format!("sendMessage: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(BenchbriefError::Notify(format!(
                "sendMessage: HTTP {status}: {}",
                truncate(&detail, 200)
            )));
        }

        info!("message delivered");
        Ok(())
    }

    /// Send every chunk in order, stopping at the first failure.
    /// Returns the number of messages delivered.
    pub async fn send_all(&self, chunks: &[String]) -> Result<usize> {
        for (i, chunk) in chunks.iter().enumerate() {
            self.send(chunk).await.map_err(|e| {
                warn!(chunk = i + 1, total = chunks.len(), "delivery failed");
                e
            })?;
        }
        Ok(chunks.len())
    }

    /// Best-effort failure notice. Its own failure is logged and swallowed
    /// so it never masks the original error.
    pub async fn send_failure_notice(&self, error: &str) {
        let text = format!("⚠️ benchbrief run failed: {}", truncate(error, FAILURE_NOTICE_LEN));
        if let Err(e) = self.send(&text).await {
            warn!(error = %e, "failure notice could not be delivered");
        }
    }
}

/// Truncate on a character boundary.
fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn notifier_for(server: &MockServer) -> Notifier {
        let config = TelegramConfig {
            api_base: server.uri(),
            ..TelegramConfig::default()
        };
        let credentials = Credentials {
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        };
        Notifier::new(&config, &credentials).unwrap()
    }

    #[tokio::test]
    async fn send_posts_expected_payload() {
        let server = MockServer::start().await;

        let expected = serde_json::json!({
            "chat_id": "42",
            "text": "hello",
            "parse_mode": "Markdown",
        });

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_json_string(expected.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        notifier_for(&server).send("hello").await.unwrap();
    }

    #[tokio::test]
    async fn non_2xx_is_a_notify_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"ok":false,"description":"bot was blocked"}"#),
            )
            .mount(&server)
            .await;

        let err = notifier_for(&server).send("hello").await.unwrap_err();
        assert!(matches!(err, BenchbriefError::Notify(_)));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn send_all_stops_at_first_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let chunks = vec!["one".to_string(), "two".to_string()];
        let err = notifier_for(&server).send_all(&chunks).await.unwrap_err();
        assert!(matches!(err, BenchbriefError::Notify(_)));
    }

    #[tokio::test]
    async fn failure_notice_swallows_its_own_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        // Must not panic or propagate
        notifier_for(&server)
            .send_failure_notice("network error: boom")
            .await;
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("αβγδ", 2), "αβ");
        assert_eq!(truncate("short", 10), "short");
    }
}
