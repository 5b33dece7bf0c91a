//! Hyperliquid info API provider.
//!
//! Open perpetual positions are read from the `clearinghouseState` query
//! of the public info endpoint. Only the account address is needed.

use crate::{FetchError, PositionSource};
use async_trait::async_trait;
use position_watch_domain::{Position, Snapshot};
use reqwest::{Client, Request};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Public mainnet info endpoint.
pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";

/// Maximum number of body characters kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Configuration for the Hyperliquid provider.
#[derive(Debug, Clone)]
pub struct HyperliquidConfig {
    /// Info endpoint URL.
    pub api_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_INFO_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Fetches open positions from the Hyperliquid info API.
#[derive(Debug, Clone)]
pub struct HyperliquidProvider {
    client: Client,
    config: HyperliquidConfig,
}

impl HyperliquidProvider {
    /// Creates a new provider.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HyperliquidConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Returns the configured endpoint.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Builds the `clearinghouseState` query for `account`.
    fn build_request(&self, account: &str) -> Result<Request, FetchError> {
        let payload = json!({
            "type": "clearinghouseState",
            "user": account,
        });

        Ok(self
            .client
            .post(&self.config.api_url)
            .json(&payload)
            .build()?)
    }
}

#[async_trait]
impl PositionSource for HyperliquidProvider {
    async fn fetch(&self, account: &str) -> Result<Snapshot, FetchError> {
        let request = self.build_request(account)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        debug!(account = %account, bytes = body.len(), "Received clearinghouse state");

        parse_clearinghouse_state(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClearinghouseState {
    #[serde(default)]
    asset_positions: Vec<AssetPosition>,
}

#[derive(Debug, Deserialize)]
struct AssetPosition {
    position: PerpPosition,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PerpPosition {
    coin: String,
    szi: Value,
    #[serde(default)]
    entry_px: Value,
    #[serde(default)]
    unrealized_pnl: Value,
    #[serde(default)]
    leverage: Option<Leverage>,
}

#[derive(Debug, Deserialize)]
struct Leverage {
    #[serde(default)]
    value: Value,
}

/// Decodes a `clearinghouseState` response body into a snapshot.
///
/// Zero-size entries are dropped. A missing `assetPositions` key is read
/// as an account without positions; any other shape that cannot be read
/// as a list of positions is an error, never an empty snapshot.
///
/// # Errors
/// Returns [`FetchError::Malformed`] for undecodable JSON, a non-object
/// body, `null` lists or entries, and missing or non-numeric sizes;
/// [`FetchError::Snapshot`] if an instrument is reported twice.
pub fn parse_clearinghouse_state(body: &str) -> Result<Snapshot, FetchError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Err(FetchError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    let state: ClearinghouseState = serde_json::from_value(value)?;

    let mut positions = Vec::new();
    for entry in state.asset_positions {
        let perp = entry.position;
        let size = parse_size(&perp.szi, &perp.coin)?;
        let mut position = Position::new(perp.coin, size);
        position.entry_price = display_value(&perp.entry_px);
        position.unrealized_pnl = display_value(&perp.unrealized_pnl);
        position.leverage = perp.leverage.as_ref().and_then(|l| display_value(&l.value));

        positions.push(position);
    }

    Ok(Snapshot::from_positions(positions)?)
}

fn parse_size(value: &Value, coin: &str) -> Result<Decimal, FetchError> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(FetchError::Malformed(format!(
                "size for {coin} is not a number: {other}"
            )));
        }
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| FetchError::Malformed(format!("size for {coin} ({text}): {e}")))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
