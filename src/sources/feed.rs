use super::sector::classify_sector;
use super::SourceAdapter;
use crate::error::{Result, SniperError};
use crate::filter::TickerFilter;
use crate::types::{CandidateSignal, RawRecord, SignalType};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:110.0) Gecko/20100101 Firefox/110.0";

// Accepted column names, first hit wins.
const TICKER_KEYS: &[&str] = &["ticker", "symbol"];
const COMPANY_KEYS: &[&str] = &["company", "name", "company_name"];
const PASSTHROUGH_KEYS: &[&str] = &[
    "sector",
    "description",
    "price",
    "change",
    "volume",
    "short_float",
];

/// A list of rows (short interest, movers, trending) published as JSON.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
    pub signal_type: SignalType,
    /// Used when a row has no sector and none can be inferred.
    pub default_sector: String,
    pub max_rows: Option<usize>,
}

pub struct JsonFeedAdapter {
    client: Client,
    config: FeedConfig,
}

impl JsonFeedAdapter {
    pub fn new(config: FeedConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Accepts a bare array or an object wrapping one under `data`, `rows`,
    /// `items` or `results`.
    pub fn parse_rows(
        &self,
        body: &JsonValue,
        filter: &TickerFilter,
    ) -> Result<Vec<CandidateSignal>> {
        let rows = body
            .as_array()
            .or_else(|| {
                ["data", "rows", "items", "results"]
                    .iter()
                    .find_map(|k| body.get(*k).and_then(|v| v.as_array()))
            })
            .ok_or_else(|| {
                SniperError::Source(format!("{}: response has no row array", self.config.name))
            })?;

        let limit = self.config.max_rows.unwrap_or(usize::MAX);
        Ok(rows
            .iter()
            .take(limit)
            .filter_map(|row| self.to_raw(row))
            .filter_map(|raw| CandidateSignal::from_raw(&raw, filter))
            .collect())
    }

    fn to_raw(&self, row: &JsonValue) -> Option<RawRecord> {
        let obj = row.as_object()?;
        let lookup = |keys: &[&str]| keys.iter().find_map(|k| obj.get(*k).and_then(scalar_text));

        let mut raw = RawRecord::new();
        raw.insert("source".into(), self.config.name.clone());
        raw.insert("signal_type".into(), self.config.signal_type.to_string());
        raw.insert("ticker".into(), lookup(TICKER_KEYS)?);
        if let Some(company) = lookup(COMPANY_KEYS) {
            raw.insert("company".into(), company);
        }
        for key in PASSTHROUGH_KEYS {
            if let Some(v) = obj.get(*key).and_then(scalar_text) {
                raw.insert((*key).to_string(), v);
            }
        }

        if !raw.contains_key("sector") {
            let company = raw.get("company").map(String::as_str).unwrap_or_default();
            let description = raw.get("description").map(String::as_str).unwrap_or_default();
            let sector = classify_sector(company, description)
                .map(String::from)
                .unwrap_or_else(|| self.config.default_sector.clone());
            raw.insert("sector".into(), sector);
        }
        Some(raw)
    }
}

#[async_trait]
impl SourceAdapter for JsonFeedAdapter {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn fetch(&self, filter: &TickerFilter) -> Result<Vec<CandidateSignal>> {
        debug!("[Feed] GET {}", self.config.url);
        let body: JsonValue = self
            .client
            .get(&self.config.url)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let candidates = self.parse_rows(&body, filter)?;
        info!("[Feed] {}: {} rows accepted", self.config.name, candidates.len());
        Ok(candidates)
    }
}

fn scalar_text(v: &JsonValue) -> Option<String> {
    let text = match v {
        JsonValue::String(s) => s.trim().to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
