use crate::error::{Result, SniperError};
use crate::types::TickerQuote;
use crate::validator::TickerLookup;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Existence lookup against the Yahoo Finance chart endpoint.
#[derive(Clone)]
pub struct YahooLookup {
    client: Client,
    base_url: String,
}

impl YahooLookup {
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TickerLookup for YahooLookup {
    async fn lookup(&self, ticker: &str) -> Result<Option<TickerQuote>> {
        let url = format!("{}/{}?interval=1d&range=1d", self.base_url, ticker);
        debug!("[Yahoo] GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SniperError::Lookup(format!("{}: HTTP {} - {}", ticker, status, body)));
        }

        let data: JsonValue = response.json().await?;
        Ok(parse_chart(&data))
    }
}

/// `None` when the chart carries an error or no `regularMarketPrice`.
pub fn parse_chart(data: &JsonValue) -> Option<TickerQuote> {
    let chart = data.get("chart")?;
    if chart.get("error").is_some_and(|e| !e.is_null()) {
        return None;
    }

    let meta = chart.get("result")?.get(0)?.get("meta")?;
    let price = meta.get("regularMarketPrice").and_then(|p| p.as_f64())?;
    let name = meta
        .get("longName")
        .or_else(|| meta.get("shortName"))
        .and_then(|n| n.as_str())
        .map(String::from);

    Some(TickerQuote {
        symbol: meta.get("symbol").and_then(|s| s.as_str())?.to_string(),
        name,
        sector: None,
        price: Some(price),
        market_cap: meta.get("marketCap").and_then(|m| m.as_f64()),
        volume: meta.get("regularMarketVolume").and_then(|v| v.as_i64()),
    })
}
