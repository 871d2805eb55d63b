use crate::filter::TickerFilter;
use crate::scorer::Scorer;
use crate::sources::SourceAdapter;
use crate::types::CandidateSignal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Ok,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub status: SourceStatus,
    pub candidates: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AggregateOutcome {
    pub signals: Vec<CandidateSignal>,
    pub sources: Vec<SourceReport>,
}

impl AggregateOutcome {
    pub fn succeeded(&self) -> usize {
        self.sources
            .iter()
            .filter(|r| r.status == SourceStatus::Ok)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.sources.len() - self.succeeded()
    }
}

/// Runs adapters, then stamps, scores, ranks and deduplicates their output.
pub struct Aggregator {
    filter: TickerFilter,
    scorer: Scorer,
    fetch_timeout: Duration,
}

impl Aggregator {
    pub fn new(filter: TickerFilter, scorer: Scorer) -> Self {
        Self {
            filter,
            scorer,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub async fn aggregate(&self, adapters: &[Box<dyn SourceAdapter>]) -> AggregateOutcome {
        let (candidates, sources) = self.collect(adapters).await;
        AggregateOutcome {
            signals: self.rank(candidates, Utc::now()),
            sources,
        }
    }

    /// Same as [`aggregate`](Self::aggregate) with a fixed run timestamp.
    pub async fn aggregate_at(
        &self,
        adapters: &[Box<dyn SourceAdapter>],
        scraped_at: DateTime<Utc>,
    ) -> AggregateOutcome {
        let (candidates, sources) = self.collect(adapters).await;
        AggregateOutcome {
            signals: self.rank(candidates, scraped_at),
            sources,
        }
    }

    /// Runs every adapter in registration order. A failing or slow adapter
    /// contributes nothing; it never aborts the run.
    async fn collect(
        &self,
        adapters: &[Box<dyn SourceAdapter>],
    ) -> (Vec<CandidateSignal>, Vec<SourceReport>) {
        let mut all = Vec::new();
        let mut reports = Vec::with_capacity(adapters.len());

        for adapter in adapters {
            let name = adapter.name().to_string();
            info!("[Aggregator] Running {}...", name);

            let fetch = adapter.fetch(&self.filter);
            let result = tokio::time::timeout(self.fetch_timeout, fetch).await;
            let (status, count) = match result {
                Ok(Ok(candidates)) if candidates.is_empty() => {
                    warn!("[Aggregator] {}: no signals", name);
                    (SourceStatus::Empty, 0)
                }
                Ok(Ok(candidates)) => {
                    let count = candidates.len();
                    info!("[Aggregator] {}: {} signals", name, count);
                    all.extend(candidates);
                    (SourceStatus::Ok, count)
                }
                Ok(Err(e)) => {
                    warn!("[Aggregator] {} failed: {}", name, e);
                    (SourceStatus::Failed(e.to_string()), 0)
                }
                Err(_) => {
                    let reason = format!("timed out after {}s", self.fetch_timeout.as_secs());
                    warn!("[Aggregator] {} {}", name, reason);
                    (SourceStatus::Failed(reason), 0)
                }
            };

            reports.push(SourceReport {
                source: name,
                status,
                candidates: count,
            });
        }

        if all.is_empty() {
            warn!("[Aggregator] No data collected from any source");
        }
        (all, reports)
    }

    /// Stamps and scores `candidates`, sorts them by score (stable, so
    /// emission order breaks ties) and keeps the first row per ticker.
    pub fn rank(
        &self,
        candidates: Vec<CandidateSignal>,
        scraped_at: DateTime<Utc>,
    ) -> Vec<CandidateSignal> {
        let mut scored: Vec<CandidateSignal> = candidates
            .into_iter()
            .map(|mut c| {
                let score = self.scorer.score(&c);
                c.stamp(scraped_at, score);
                c
            })
            .collect();

        scored.sort_by(|a, b| b.signal_score().cmp(&a.signal_score()));

        let mut seen = HashSet::new();
        scored.retain(|c| seen.insert(c.ticker().to_string()));
        scored
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(TickerFilter::default(), Scorer::default())
    }
}
