use crate::aggregator::{Aggregator, SourceReport};
use crate::sources::SourceAdapter;
use crate::summary::sector_summary;
use crate::types::CandidateSignal;
use crate::validator::{ExistenceValidator, TickerLookup};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one pipeline run. `signals` is the data; the rest is status.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub signals: Vec<CandidateSignal>,
    pub sources: Vec<SourceReport>,
    pub aggregated: usize,
    /// `None` when validation was skipped.
    pub validated: Option<usize>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Aggregation followed by optional existence validation.
///
/// Holds no state between runs: every call fetches fresh data.
pub struct Pipeline {
    adapters: Vec<Box<dyn SourceAdapter>>,
    aggregator: Aggregator,
    validation: Option<(ExistenceValidator, Arc<dyn TickerLookup>)>,
    min_score: u8,
}

impl Pipeline {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            adapters: Vec::new(),
            aggregator,
            validation: None,
            min_score: 0,
        }
    }

    /// Adapters run in the order they are added.
    pub fn with_adapter(mut self, adapter: Box<dyn SourceAdapter>) -> Self {
        self.adapters.push(adapter);
        self
    }

    pub fn with_validation(
        mut self,
        validator: ExistenceValidator,
        lookup: Arc<dyn TickerLookup>,
    ) -> Self {
        self.validation = Some((validator, lookup));
        self
    }

    pub fn with_min_score(mut self, min_score: u8) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub async fn run(&self) -> Vec<CandidateSignal> {
        self.run_report().await.signals
    }

    pub async fn run_report(&self) -> RunReport {
        let started_at = Utc::now();
        info!("[Pipeline] Run started with {} source(s)", self.adapters.len());

        let outcome = self.aggregator.aggregate(&self.adapters).await;
        info!(
            "[Pipeline] Sources: {} ok, {} failed/empty",
            outcome.succeeded(),
            outcome.failed()
        );
        let aggregated = outcome.signals.len();

        let (signals, validated) = match &self.validation {
            Some(_) if outcome.signals.is_empty() => (Vec::new(), Some(0)),
            Some((validator, lookup)) => {
                let kept = validator.validate(outcome.signals, lookup.as_ref()).await;
                let count = kept.len();
                (kept, Some(count))
            }
            None => (outcome.signals, None),
        };

        let signals: Vec<CandidateSignal> = signals
            .into_iter()
            .filter(|s| s.signal_score() >= self.min_score)
            .collect();

        self.log_results(aggregated, &signals);

        RunReport {
            signals,
            sources: outcome.sources,
            aggregated,
            validated,
            started_at,
            finished_at: Utc::now(),
        }
    }

    fn log_results(&self, aggregated: usize, signals: &[CandidateSignal]) {
        match signals.first() {
            Some(top) => {
                info!(
                    "[Pipeline] {} unique signals ({} before validation/threshold)",
                    signals.len(),
                    aggregated
                );
                info!(
                    "[Pipeline] Top signal: {} (score: {}, {}, {})",
                    top.ticker(),
                    top.signal_score(),
                    top.signal_type(),
                    top.source()
                );
                for stats in sector_summary(signals) {
                    info!(
                        "[Pipeline]   {:<20} count={} mean={:.2} max={}",
                        stats.sector, stats.count, stats.mean_score, stats.max_score
                    );
                }
            }
            None => warn!("[Pipeline] No signals found"),
        }
    }
}
