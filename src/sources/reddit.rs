use super::SourceAdapter;
use crate::error::Result;
use crate::filter::TickerFilter;
use crate::types::{CandidateSignal, SignalType};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "SignalSniper/1.0";
pub const REDDIT_SECTOR: &str = "reddit_hype";

lazy_static! {
    static ref CASHTAG: Regex = Regex::new(r"\$([A-Z]{1,5})\b").unwrap();
    static ref BARE_CAPS: Regex = Regex::new(r"\b([A-Z]{2,5})\b").unwrap();
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Child>,
}

#[derive(Debug, Deserialize)]
struct Child {
    data: Post,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
}

/// Ticker mentions in a subreddit's hot posts.
pub struct RedditAdapter {
    client: Client,
    name: String,
    url: String,
    post_limit: usize,
}

impl RedditAdapter {
    pub fn new(subreddit: &str, post_limit: usize, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        let name = if subreddit.eq_ignore_ascii_case("wallstreetbets") {
            "Reddit WSB".to_string()
        } else {
            format!("Reddit r/{}", subreddit)
        };
        Ok(Self {
            client,
            name,
            url: format!("https://www.reddit.com/r/{}/hot.json", subreddit),
            post_limit,
        })
    }

    /// One candidate per post at most: the first valid ticker mentioned.
    pub fn parse_listing(
        &self,
        body: &str,
        filter: &TickerFilter,
    ) -> Result<Vec<CandidateSignal>> {
        let listing: Listing = serde_json::from_str(body)?;
        Ok(listing
            .data
            .children
            .into_iter()
            .take(self.post_limit)
            .filter_map(|child| {
                let text = format!("{} {}", child.data.title, child.data.selftext);
                let ticker = extract_ticker(&text, filter)?;
                CandidateSignal::new(
                    &self.name,
                    &ticker,
                    SignalType::SocialSentiment,
                    REDDIT_SECTOR,
                    filter,
                )
                .map(|c| c.with_description(text.trim()))
            })
            .collect())
    }
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, filter: &TickerFilter) -> Result<Vec<CandidateSignal>> {
        debug!("[Reddit] GET {}", self.url);
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let candidates = self.parse_listing(&body, filter)?;
        info!("[Reddit] {}: {} ticker mentions", self.name, candidates.len());
        Ok(candidates)
    }
}

/// Cashtags (`$GME`) take precedence; bare 2-5 letter capitalised words are
/// only considered when the text has no cashtag at all.
pub fn extract_ticker(text: &str, filter: &TickerFilter) -> Option<String> {
    let cashtags: Vec<&str> = CASHTAG
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let candidates = if cashtags.is_empty() {
        BARE_CAPS
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect()
    } else {
        cashtags
    };

    candidates
        .into_iter()
        .find(|t| filter.is_valid(t))
        .map(String::from)
}
