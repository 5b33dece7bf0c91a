//! Telegram Bot API notifier.

use super::{Alert, Notifier, NotifyError};
use async_trait::async_trait;
use reqwest::{Client, Request};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

/// Public Bot API base URL.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Bot API limit on message length.
const MAX_MESSAGE_CHARS: usize = 4096;

/// Configuration for the Telegram notifier.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot API base URL.
    pub api_url: String,
    /// Bot token.
    pub bot_token: String,
    /// Target chat ID or `@channel` name.
    pub chat_id: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Creates a configuration for the public Bot API.
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            timeout_secs: 10,
        }
    }
}

/// Sends alerts to a Telegram chat through `sendMessage`.
#[derive(Debug, Clone)]
pub struct TelegramNotifier {
    client: Client,
    config: TelegramConfig,
}

impl TelegramNotifier {
    /// Creates a new Telegram notifier.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.config.api_url.trim_end_matches('/'),
            self.config.bot_token
        )
    }

    fn build_request(&self, text: &str) -> Result<Request, NotifyError> {
        let payload = json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
            "disable_web_page_preview": true,
        });

        Ok(self.client.post(self.endpoint()).json(&payload).build()?)
    }

    async fn send_chunk(&self, text: &str) -> Result<(), NotifyError> {
        let request = self.build_request(text)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        let chunks = split_message(&alert.text, MAX_MESSAGE_CHARS);
        debug!(id = %alert.id, chunks = chunks.len(), "Sending Telegram alert");

        for chunk in &chunks {
            self.send_chunk(chunk).await?;
        }

        info!(id = %alert.id, kind = ?alert.kind, "Telegram alert delivered");
        Ok(())
    }
}

/// Splits `text` into pieces of at most `limit` characters, breaking on
/// line boundaries where possible. A line longer than `limit` is cut so that
/// no HTML tag or entity straddles two pieces.
pub(crate) fn split_message(text: &str, limit: usize) -> Vec<String> {
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let separator = usize::from(current_len > 0);

        if current_len + separator + line_len <= limit {
            if separator == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += separator + line_len;
            continue;
        }

        if current_len > 0 {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            chunks.extend(split_line(line, limit));
        }
    }

    if current_len > 0 {
        chunks.push(current);
    }

    chunks
}

fn split_line(line: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let mut end = (start + limit).min(chars.len());
        if end < chars.len()
            && let Some(open) = open_markup(&chars[start..end]).filter(|&open| open > 0)
        {
            end = start + open;
        }
        pieces.push(chars[start..end].iter().collect());
        start = end;
    }

    pieces
}

/// Index of a trailing `<` or `&` whose `>` or `;` lies outside `window`.
fn open_markup(window: &[char]) -> Option<usize> {
    let open = window.iter().rposition(|c| matches!(c, '<' | '&'))?;
    let close = if window[open] == '<' { '>' } else { ';' };
    if window[open..].contains(&close) {
        None
    } else {
        Some(open)
    }
}
