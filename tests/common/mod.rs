#![allow(dead_code)]

use async_trait::async_trait;
use signal_sniper::error::{Result, SniperError};
use signal_sniper::types::RawRecord;
use signal_sniper::{
    CandidateSignal, SignalType, SourceAdapter, TickerFilter, TickerLookup, TickerQuote,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn raw(source: &str, ticker: &str, signal_type: &str, sector: &str) -> RawRecord {
    [
        ("source", source),
        ("ticker", ticker),
        ("signal_type", signal_type),
        ("sector", sector),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn with_description(mut record: RawRecord, description: &str) -> RawRecord {
    record.insert("description".into(), description.into());
    record
}

pub fn candidate(source: &str, ticker: &str) -> CandidateSignal {
    CandidateSignal::new(source, ticker, SignalType::Momentum, "movers", &TickerFilter::default())
        .expect("valid test candidate")
}

/// Emits its records through the filter, like a real adapter.
pub struct StaticAdapter {
    pub name: String,
    pub records: Vec<RawRecord>,
}

impl StaticAdapter {
    pub fn boxed(name: &str, records: Vec<RawRecord>) -> Box<dyn SourceAdapter> {
        Box::new(Self {
            name: name.to_string(),
            records,
        })
    }
}

#[async_trait]
impl SourceAdapter for StaticAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, filter: &TickerFilter) -> Result<Vec<CandidateSignal>> {
        Ok(self
            .records
            .iter()
            .filter_map(|r| CandidateSignal::from_raw(r, filter))
            .collect())
    }
}

pub struct FailingAdapter;

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn name(&self) -> &str {
        "Broken Source"
    }

    async fn fetch(&self, _filter: &TickerFilter) -> Result<Vec<CandidateSignal>> {
        Err(SniperError::Source("connection reset".into()))
    }
}

pub struct SlowAdapter(pub Duration);

#[async_trait]
impl SourceAdapter for SlowAdapter {
    fn name(&self) -> &str {
        "Slow Source"
    }

    async fn fetch(&self, filter: &TickerFilter) -> Result<Vec<CandidateSignal>> {
        tokio::time::sleep(self.0).await;
        Ok(CandidateSignal::new("Slow Source", "SLOW", SignalType::Trending, "trending", filter)
            .into_iter()
            .collect())
    }
}

/// Reports a fixed set of tickers as real; tracks how many lookups overlap.
pub struct StubLookup {
    pub known: HashSet<String>,
    pub failing: HashSet<String>,
    pub delay: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
}

impl StubLookup {
    pub fn new(known: &[&str]) -> Self {
        Self {
            known: known.iter().map(|s| s.to_string()).collect(),
            failing: HashSet::new(),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_on(mut self, tickers: &[&str]) -> Self {
        self.failing = tickers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl TickerLookup for StubLookup {
    async fn lookup(&self, ticker: &str) -> Result<Option<TickerQuote>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(ticker) {
            return Err(SniperError::Lookup(format!("{}: upstream 500", ticker)));
        }
        if !self.known.contains(ticker) {
            return Ok(None);
        }
        Ok(Some(TickerQuote {
            symbol: ticker.to_string(),
            name: Some(format!("{} Corp", ticker)),
            sector: None,
            price: Some(12.5),
            market_cap: None,
            volume: Some(1_000_000),
        }))
    }
}

/// Lookup service that is down.
pub struct DeadLookup;

#[async_trait]
impl TickerLookup for DeadLookup {
    async fn lookup(&self, _ticker: &str) -> Result<Option<TickerQuote>> {
        Err(SniperError::Lookup("connection refused".into()))
    }
}
