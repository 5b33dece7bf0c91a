//! Environment-based configuration.

use position_watch_data::providers::{DEFAULT_INFO_URL, HyperliquidConfig};
use position_watch_execution::alerts::{DEFAULT_TELEGRAM_API_URL, TelegramConfig};
use position_watch_execution::monitor::DEFAULT_POLL_INTERVAL_SECS;
use std::env;
use std::time::Duration;

const ACCOUNT_VARS: &[&str] = &["ACCOUNT_ADDRESS", "WALLET_ADDRESS"];
const BOT_TOKEN_VARS: &[&str] = &["TELEGRAM_BOT_TOKEN", "telegram_bot_token"];
const CHAT_ID_VARS: &[&str] = &["TELEGRAM_CHAT_ID", "telegram_chat_id"];
const POLL_INTERVAL_VAR: &str = "POLL_INTERVAL_SECONDS";
const INFO_URL_VAR: &str = "HYPERLIQUID_API_URL";
const TELEGRAM_URL_VAR: &str = "TELEGRAM_API_URL";
const FETCH_TIMEOUT_VAR: &str = "FETCH_TIMEOUT_SECONDS";
const NOTIFY_TIMEOUT_VAR: &str = "NOTIFY_TIMEOUT_SECONDS";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required value is not set.
    #[error("{var} must be set in .env or environment")]
    Missing {
        /// Variable name.
        var: &'static str,
    },
    /// A value could not be parsed.
    #[error("Invalid {var}={value:?}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Account to watch.
    pub account: Option<String>,
    /// Telegram bot token.
    pub bot_token: Option<String>,
    /// Telegram chat target.
    pub chat_id: Option<String>,
    /// Pause between two checks.
    pub poll_interval: Duration,
    /// Hyperliquid info endpoint.
    pub info_url: String,
    /// Telegram Bot API base URL.
    pub telegram_api_url: String,
    /// Fetch timeout in seconds.
    pub fetch_timeout_secs: u64,
    /// Notification timeout in seconds.
    pub notify_timeout_secs: u64,
}

impl AppConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if a numeric value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// Returns an error if a numeric value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let first = |keys: &[&str]| keys.iter().find_map(|&k| get(k));

        let poll_secs = parse_secs(
            POLL_INTERVAL_VAR,
            get(POLL_INTERVAL_VAR),
            DEFAULT_POLL_INTERVAL_SECS,
        )?;

        Ok(Self {
            account: first(ACCOUNT_VARS),
            bot_token: first(BOT_TOKEN_VARS),
            chat_id: first(CHAT_ID_VARS),
            poll_interval: Duration::from_secs(poll_secs),
            info_url: get(INFO_URL_VAR).unwrap_or_else(|| DEFAULT_INFO_URL.to_string()),
            telegram_api_url: get(TELEGRAM_URL_VAR)
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            fetch_timeout_secs: parse_secs(FETCH_TIMEOUT_VAR, get(FETCH_TIMEOUT_VAR), 30)?,
            notify_timeout_secs: parse_secs(NOTIFY_TIMEOUT_VAR, get(NOTIFY_TIMEOUT_VAR), 10)?,
        })
    }

    /// Resolves the account, preferring an explicit override.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if neither is set.
    pub fn resolve_account(&self, override_account: Option<&str>) -> Result<String, ConfigError> {
        override_account
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| self.account.clone())
            .ok_or(ConfigError::Missing {
                var: ACCOUNT_VARS[0],
            })
    }

    /// Resolves the polling interval, preferring an explicit override.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] for a zero override.
    pub fn resolve_interval(&self, override_secs: Option<u64>) -> Result<Duration, ConfigError> {
        match override_secs {
            Some(0) => Err(ConfigError::Invalid {
                var: POLL_INTERVAL_VAR,
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            }),
            Some(secs) => Ok(Duration::from_secs(secs)),
            None => Ok(self.poll_interval),
        }
    }

    /// Builds the Hyperliquid provider configuration.
    #[must_use]
    pub fn hyperliquid(&self) -> HyperliquidConfig {
        HyperliquidConfig {
            api_url: self.info_url.clone(),
            timeout_secs: self.fetch_timeout_secs,
        }
    }

    /// Builds the Telegram notifier configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] if the token or chat is unset.
    pub fn telegram(&self) -> Result<TelegramConfig, ConfigError> {
        let bot_token = self.bot_token.clone().ok_or(ConfigError::Missing {
            var: BOT_TOKEN_VARS[0],
        })?;
        let chat_id = self.chat_id.clone().ok_or(ConfigError::Missing {
            var: CHAT_ID_VARS[0],
        })?;

        let mut config = TelegramConfig::new(bot_token, chat_id);
        config.api_url = self.telegram_api_url.clone();
        config.timeout_secs = self.notify_timeout_secs;
        Ok(config)
    }
}

fn parse_secs(var: &'static str, value: Option<String>, default: u64) -> Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    match value.parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid {
            var,
            value,
            reason: "must be greater than zero".to_string(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();

        assert!(config.account.is_none());
        assert_eq!(config.poll_interval, Duration::from_secs(900));
        assert_eq!(config.info_url, DEFAULT_INFO_URL);
        assert_eq!(config.fetch_timeout_secs, 30);
        assert_eq!(config.notify_timeout_secs, 10);
        assert_eq!(
            config.resolve_account(None),
            Err(ConfigError::Missing {
                var: "ACCOUNT_ADDRESS"
            })
        );
        assert!(matches!(
            config.telegram(),
            Err(ConfigError::Missing {
                var: "TELEGRAM_BOT_TOKEN"
            })
        ));
    }

    #[test]
    fn test_full_environment() {
        let config = config(&[
            ("WALLET_ADDRESS", "0xabc"),
            ("telegram_bot_token", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100"),
            ("POLL_INTERVAL_SECONDS", "60"),
            ("TELEGRAM_API_URL", "http://localhost:8081"),
        ])
        .unwrap();

        assert_eq!(config.resolve_account(None).unwrap(), "0xabc");
        assert_eq!(config.resolve_account(Some("0xdef")).unwrap(), "0xdef");
        assert_eq!(config.poll_interval, Duration::from_secs(60));

        let telegram = config.telegram().unwrap();
        assert_eq!(telegram.bot_token, "123:abc");
        assert_eq!(telegram.chat_id, "-100");
        assert_eq!(telegram.api_url, "http://localhost:8081");
        assert_eq!(telegram.timeout_secs, 10);
    }

    #[test]
    fn test_upper_case_wins() {
        let config = config(&[
            ("ACCOUNT_ADDRESS", "0x1"),
            ("WALLET_ADDRESS", "0x2"),
            ("TELEGRAM_BOT_TOKEN", "upper"),
            ("telegram_bot_token", "lower"),
        ])
        .unwrap();

        assert_eq!(config.account.as_deref(), Some("0x1"));
        assert_eq!(config.bot_token.as_deref(), Some("upper"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config(&[("ACCOUNT_ADDRESS", "  "), ("WALLET_ADDRESS", "0x2")]).unwrap();
        assert_eq!(config.account.as_deref(), Some("0x2"));
    }

    #[test]
    fn test_invalid_interval() {
        assert!(matches!(
            config(&[("POLL_INTERVAL_SECONDS", "fifteen")]),
            Err(ConfigError::Invalid {
                var: "POLL_INTERVAL_SECONDS",
                ..
            })
        ));
        assert!(matches!(
            config(&[("POLL_INTERVAL_SECONDS", "0")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_interval_override() {
        let config = config(&[]).unwrap();
        assert_eq!(
            config.resolve_interval(Some(30)).unwrap(),
            Duration::from_secs(30)
        );
        assert_eq!(
            config.resolve_interval(None).unwrap(),
            Duration::from_secs(900)
        );
        assert!(config.resolve_interval(Some(0)).is_err());
    }
}
