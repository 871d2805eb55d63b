use crate::filter::TickerFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DESCRIPTION_MAX_CHARS: usize = 150;
pub const COMPANY_MAX_CHARS: usize = 50;

/// Field name -> raw text, as parsed by an adapter before it becomes a candidate.
pub type RawRecord = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SignalType {
    ShortSqueeze,
    SocialSentiment,
    Momentum,
    Trending,
    PremarketMover,
    InsiderTrading,
    UnusualOptions,
    FdaCatalyst,
    AiCatalyst,
    EnergyCatalyst,
    Other(String),
}

impl SignalType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ShortSqueeze => "short_squeeze",
            Self::SocialSentiment => "social_sentiment",
            Self::Momentum => "momentum",
            Self::Trending => "trending",
            Self::PremarketMover => "premarket_mover",
            Self::InsiderTrading => "insider_trading",
            Self::UnusualOptions => "unusual_options",
            Self::FdaCatalyst => "fda_catalyst",
            Self::AiCatalyst => "ai_catalyst",
            Self::EnergyCatalyst => "energy_catalyst",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for SignalType {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "short_squeeze" => Self::ShortSqueeze,
            "social_sentiment" => Self::SocialSentiment,
            "momentum" => Self::Momentum,
            "trending" => Self::Trending,
            "premarket_mover" => Self::PremarketMover,
            "insider_trading" => Self::InsiderTrading,
            "unusual_options" => Self::UnusualOptions,
            "fda_catalyst" => Self::FdaCatalyst,
            "ai_catalyst" => Self::AiCatalyst,
            "energy_catalyst" => Self::EnergyCatalyst,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for SignalType {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<SignalType> for String {
    fn from(t: SignalType) -> Self {
        t.as_str().to_string()
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation about one ticker from one source.
///
/// Only the constructors can set the identity fields, so every instance
/// carries a ticker that passed the [`TickerFilter`]. The aggregator fills in
/// `scraped_at` and `signal_score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSignal {
    source: String,
    ticker: String,
    signal_type: SignalType,
    sector: String,
    description: Option<String>,
    company: Option<String>,
    price: Option<String>,
    change: Option<String>,
    volume: Option<String>,
    short_float: Option<String>,
    scraped_at: Option<DateTime<Utc>>,
    signal_score: u8,
}

impl CandidateSignal {
    /// Returns `None` when the ticker is rejected by `filter` or a required
    /// field is blank.
    pub fn new(
        source: &str,
        ticker: &str,
        signal_type: SignalType,
        sector: &str,
        filter: &TickerFilter,
    ) -> Option<Self> {
        let ticker = ticker.trim().to_ascii_uppercase();
        let source = source.trim();
        let sector = sector.trim();
        if source.is_empty() || sector.is_empty() || signal_type.as_str().is_empty() {
            return None;
        }
        if !filter.is_valid(&ticker) {
            return None;
        }
        Some(Self {
            source: source.to_string(),
            ticker,
            signal_type,
            sector: sector.to_string(),
            description: None,
            company: None,
            price: None,
            change: None,
            volume: None,
            short_float: None,
            scraped_at: None,
            signal_score: 0,
        })
    }

    /// Builds a candidate from loosely typed adapter output.
    pub fn from_raw(raw: &RawRecord, filter: &TickerFilter) -> Option<Self> {
        let field = |key: &str| raw.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let mut candidate = Self::new(
            field("source")?,
            field("ticker")?,
            SignalType::from(field("signal_type")?),
            field("sector")?,
            filter,
        )?;
        candidate.description = field("description").map(|d| truncate(d, DESCRIPTION_MAX_CHARS));
        candidate.company = field("company").map(|c| truncate(c, COMPANY_MAX_CHARS));
        candidate.price = field("price").map(String::from);
        candidate.change = field("change").map(String::from);
        candidate.volume = field("volume").map(String::from);
        candidate.short_float = field("short_float").map(String::from);
        Some(candidate)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(truncate(description, DESCRIPTION_MAX_CHARS));
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(truncate(company, COMPANY_MAX_CHARS));
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn signal_type(&self) -> &SignalType {
        &self.signal_type
    }

    pub fn sector(&self) -> &str {
        &self.sector
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn price(&self) -> Option<&str> {
        self.price.as_deref()
    }

    pub fn change(&self) -> Option<&str> {
        self.change.as_deref()
    }

    pub fn volume(&self) -> Option<&str> {
        self.volume.as_deref()
    }

    pub fn short_float(&self) -> Option<&str> {
        self.short_float.as_deref()
    }

    pub fn scraped_at(&self) -> Option<DateTime<Utc>> {
        self.scraped_at
    }

    pub fn signal_score(&self) -> u8 {
        self.signal_score
    }

    pub(crate) fn stamp(&mut self, scraped_at: DateTime<Utc>, signal_score: u8) {
        self.scraped_at = Some(scraped_at);
        self.signal_score = signal_score;
    }
}

/// Result of an existence lookup for a single symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerQuote {
    pub symbol: String,
    pub name: Option<String>,
    pub sector: Option<String>,
    pub price: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<i64>,
}

impl TickerQuote {
    /// Real and currently priced.
    pub fn is_tradable(&self) -> bool {
        self.price.is_some_and(|p| p.is_finite() && p > 0.0)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
