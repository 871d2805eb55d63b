pub mod aggregator;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod scorer;
pub mod sink;
pub mod sources;
pub mod summary;
pub mod types;
pub mod validator;
pub mod yahoo;

pub use aggregator::Aggregator;
pub use error::{Result, SniperError};
pub use filter::{is_valid_ticker, TickerFilter};
pub use pipeline::{Pipeline, RunReport};
pub use scorer::{Scorer, ScoringConfig};
pub use sources::SourceAdapter;
pub use types::{CandidateSignal, SignalType, TickerQuote};
pub use validator::{ExistenceValidator, TickerLookup};
