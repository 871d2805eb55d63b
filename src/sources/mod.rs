pub mod feed;
pub mod reddit;
pub mod sector;

use crate::error::Result;
use crate::filter::TickerFilter;
use crate::types::CandidateSignal;
use async_trait::async_trait;

pub use feed::{FeedConfig, JsonFeedAdapter};
pub use reddit::RedditAdapter;

/// One external source of candidate signals.
///
/// Adapters run every ticker through `filter` before emitting it; anything the
/// filter rejects never reaches scoring.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self, filter: &TickerFilter) -> Result<Vec<CandidateSignal>>;
}
