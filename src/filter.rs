use lazy_static::lazy_static;
use std::collections::HashSet;

pub const MAX_TICKER_LEN: usize = 5;

/// Acronyms and chatter that look exactly like tickers.
pub const DEFAULT_DENY_LIST: &[&str] = &[
    "AI", "CEO", "IPO", "USA", "SEC", "FDA", "LLC", "INC", "NYSE", "NASDAQ",
    "ETF", "API", "URL", "HTTP", "HTML", "JSON", "XML", "PDF", "WSB", "DD",
    "YOLO", "FD", "PUT", "CALL", "BUY", "SELL", "HOLD", "NEW", "OLD",
];

lazy_static! {
    static ref DEFAULT_FILTER: TickerFilter = TickerFilter::default();
}

/// Syntactic ticker check: 1-5 uppercase ASCII letters, not on the deny-list.
#[derive(Debug, Clone)]
pub struct TickerFilter {
    deny_list: HashSet<String>,
}

impl TickerFilter {
    pub fn with_deny_list<I, S>(deny_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deny_list: deny_list.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_valid(&self, ticker: &str) -> bool {
        if ticker.is_empty() || ticker.len() > MAX_TICKER_LEN {
            return false;
        }
        if !ticker.chars().all(|c| c.is_ascii_uppercase()) {
            return false;
        }
        !self.deny_list.contains(ticker)
    }

    pub fn is_denied(&self, ticker: &str) -> bool {
        self.deny_list.contains(ticker)
    }
}

impl Default for TickerFilter {
    fn default() -> Self {
        Self::with_deny_list(DEFAULT_DENY_LIST.iter().copied())
    }
}

/// Checks `ticker` against the default deny-list.
pub fn is_valid_ticker(ticker: &str) -> bool {
    DEFAULT_FILTER.is_valid(ticker)
}
