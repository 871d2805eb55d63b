use crate::error::{Result, SniperError};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Runtime settings, read from the environment (and `.env` via dotenvy).
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub scan_interval: Duration,
    pub fetch_timeout: Duration,
    pub lookup_timeout: Duration,
    pub validate_top_n: usize,
    pub validation_concurrency: usize,
    pub skip_validation: bool,
    pub min_score: u8,
    pub reddit_subreddit: String,
    pub reddit_post_limit: usize,
    pub webhook_url: Option<String>,
    pub short_interest_feed_url: Option<String>,
    pub movers_feed_url: Option<String>,
    pub trending_feed_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| get(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            port: parse_or(&var, "PORT", 3003)?,
            scan_interval: Duration::from_secs(parse_or(&var, "SCAN_INTERVAL_SECS", 60)?),
            fetch_timeout: Duration::from_secs(parse_or(&var, "FETCH_TIMEOUT_SECS", 15)?),
            lookup_timeout: Duration::from_secs(parse_or(&var, "LOOKUP_TIMEOUT_SECS", 10)?),
            validate_top_n: parse_or(&var, "VALIDATE_TOP_N", 20)?,
            validation_concurrency: parse_or(&var, "VALIDATION_CONCURRENCY", 10)?,
            skip_validation: parse_or(&var, "SKIP_VALIDATION", false)?,
            min_score: parse_or(&var, "MIN_SCORE", 0)?,
            reddit_subreddit: var("REDDIT_SUBREDDIT").unwrap_or_else(|| "wallstreetbets".into()),
            reddit_post_limit: parse_or(&var, "REDDIT_POST_LIMIT", 20)?,
            webhook_url: var("WEBHOOK_URL"),
            short_interest_feed_url: var("SHORT_INTEREST_FEED_URL"),
            movers_feed_url: var("MOVERS_FEED_URL"),
            trending_feed_url: var("TRENDING_FEED_URL"),
        })
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| SniperError::Config(format!("{} must be valid ({}): {}", key, raw, e))),
        None => Ok(default),
    }
}
