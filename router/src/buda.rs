//! Buda.com public API client.

use std::time::Duration;

use async_trait::async_trait;
use fiatbridge_common::MarketId;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::conversion::parse_decimal;
use crate::error::Unavailable;
use crate::lookup::Lookup;
use crate::source::MarketSource;

/// Public API root of the venue.
pub const DEFAULT_BASE_URL: &str = "https://www.buda.com/api/v2";

/// Configuration for the Buda client.
#[derive(Debug, Clone)]
pub struct BudaConfig {
    /// API root, without trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for BudaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            user_agent: format!("fiatbridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Market source backed by the Buda.com REST API.
#[derive(Debug, Clone)]
pub struct BudaClient {
    http: reqwest::Client,
    base_url: String,
}

impl BudaClient {
    /// Create a client; fails only if the TLS backend cannot be initialized.
    pub fn new(config: BudaConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn markets_url(&self) -> String {
        format!("{}/markets", self.base_url)
    }

    fn ticker_url(&self, market: &MarketId) -> String {
        format!("{}/markets/{}/ticker", self.base_url, market)
    }

    async fn get_text(&self, url: &str) -> Result<String, Unavailable> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Unavailable::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Unavailable::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| Unavailable::Transport(format!("failed to read body: {}", e)))
    }
}

#[async_trait]
impl MarketSource for BudaClient {
    fn name(&self) -> &str {
        "buda"
    }

    async fn list_markets(&self) -> Lookup<Vec<String>> {
        let url = self.markets_url();
        let result = match self.get_text(&url).await {
            Ok(body) => parse_markets(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(ids) => debug!(markets = ids.len(), "Fetched market catalog"),
            Err(e) => warn!(url = %url, error = %e, "Market catalog unavailable"),
        }

        result.into()
    }

    async fn last_price(&self, market: &MarketId) -> Lookup<Decimal> {
        let result = match self.get_text(&self.ticker_url(market)).await {
            Ok(body) => parse_last_price(&body),
            Err(e) => Err(e),
        };

        match &result {
            Ok(price) => debug!(market = %market, price = %price, "Fetched last price"),
            Err(e) => debug!(market = %market, error = %e, "Last price unavailable"),
        }

        result.into()
    }
}

#[derive(Deserialize)]
struct MarketsEnvelope {
    #[serde(default)]
    markets: Vec<MarketEntry>,
}

#[derive(Deserialize)]
struct MarketEntry {
    id: Option<String>,
}

#[derive(Deserialize)]
struct TickerEnvelope {
    ticker: Ticker,
}

#[derive(Deserialize)]
struct Ticker {
    last_price: Vec<Value>,
}

/// Extract market ids from a `GET /markets` body.
///
/// A body without a `markets` field is an empty catalog. Entries without an
/// id are dropped.
pub fn parse_markets(body: &str) -> Result<Vec<String>, Unavailable> {
    let envelope: MarketsEnvelope =
        serde_json::from_str(body).map_err(|e| Unavailable::Malformed(e.to_string()))?;

    Ok(envelope.markets.into_iter().filter_map(|m| m.id).collect())
}

/// Extract `ticker.last_price[0]` from a `GET /markets/{id}/ticker` body.
pub fn parse_last_price(body: &str) -> Result<Decimal, Unavailable> {
    let envelope: TickerEnvelope =
        serde_json::from_str(body).map_err(|e| Unavailable::Malformed(e.to_string()))?;

    let first = envelope
        .ticker
        .last_price
        .into_iter()
        .next()
        .ok_or_else(|| Unavailable::Malformed("empty last_price".to_string()))?;

    let raw = match first {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => return Err(Unavailable::NonNumeric(other.to_string())),
    };

    parse_decimal(&raw).ok_or(Unavailable::NonNumeric(raw))
}
