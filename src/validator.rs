use crate::error::Result;
use crate::types::{CandidateSignal, TickerQuote};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TOP_N: usize = 20;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// External market-data lookup. `Ok(None)` means the symbol is unknown.
#[async_trait]
pub trait TickerLookup: Send + Sync {
    async fn lookup(&self, ticker: &str) -> Result<Option<TickerQuote>>;
}

/// Best-effort check that the highest ranked tickers are real, priced instruments.
#[derive(Debug, Clone)]
pub struct ExistenceValidator {
    top_n: usize,
    concurrency: usize,
    lookup_timeout: Duration,
}

impl ExistenceValidator {
    pub fn new(top_n: usize, concurrency: usize, lookup_timeout: Duration) -> Self {
        Self {
            top_n,
            concurrency: concurrency.max(1),
            lookup_timeout,
        }
    }

    /// Keeps candidates whose ticker is among the first `top_n` distinct
    /// tickers and was confirmed by `lookup`, in their original order.
    pub async fn validate(
        &self,
        candidates: Vec<CandidateSignal>,
        lookup: &dyn TickerLookup,
    ) -> Vec<CandidateSignal> {
        let tickers = self.shortlist(&candidates);
        if tickers.is_empty() {
            return Vec::new();
        }

        let verified = self.verify_all(tickers, lookup).await;
        let confirmed = verified.values().filter(|ok| **ok).count();
        info!("[Validator] Validated {}/{} tickers", confirmed, verified.len());

        candidates
            .into_iter()
            .filter(|c| verified.get(c.ticker()).copied().unwrap_or(false))
            .collect()
    }

    fn shortlist(&self, candidates: &[CandidateSignal]) -> Vec<String> {
        let mut seen = HashSet::new();
        candidates
            .iter()
            .map(|c| c.ticker())
            .filter(|t| seen.insert(*t))
            .take(self.top_n)
            .map(String::from)
            .collect()
    }

    /// Each ticker gets its own slot; completion order does not matter.
    async fn verify_all(
        &self,
        tickers: Vec<String>,
        lookup: &dyn TickerLookup,
    ) -> HashMap<String, bool> {
        let timeout = self.lookup_timeout;

        stream::iter(tickers.into_iter().map(move |ticker| async move {
            let ok = match tokio::time::timeout(timeout, lookup.lookup(&ticker)).await {
                Ok(Ok(Some(quote))) => quote.is_tradable(),
                Ok(Ok(None)) => {
                    debug!("[Validator] {}: not found", ticker);
                    false
                }
                Ok(Err(e)) => {
                    warn!("[Validator] {}: lookup failed: {}", ticker, e);
                    false
                }
                Err(_) => {
                    warn!("[Validator] {}: lookup timed out after {}s", ticker, timeout.as_secs());
                    false
                }
            };
            (ticker, ok)
        }))
        .buffer_unordered(self.concurrency)
        .collect()
        .await
    }
}

impl Default for ExistenceValidator {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, DEFAULT_CONCURRENCY, DEFAULT_LOOKUP_TIMEOUT)
    }
}
