use signal_sniper::config::Settings;
use signal_sniper::SniperError;
use std::collections::HashMap;
use std::time::Duration;

fn settings(pairs: &[(&str, &str)]) -> Result<Settings, SniperError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_unset() {
    let s = settings(&[]).unwrap();
    assert_eq!(s.port, 3003);
    assert_eq!(s.scan_interval, Duration::from_secs(60));
    assert_eq!(s.validate_top_n, 20);
    assert_eq!(s.validation_concurrency, 10);
    assert_eq!(s.min_score, 0);
    assert!(!s.skip_validation);
    assert_eq!(s.reddit_subreddit, "wallstreetbets");
    assert!(s.webhook_url.is_none());
    assert!(s.short_interest_feed_url.is_none());
}

#[test]
fn overrides_are_parsed() {
    let s = settings(&[
        ("PORT", "8080"),
        ("VALIDATE_TOP_N", "5"),
        ("LOOKUP_TIMEOUT_SECS", "3"),
        ("SKIP_VALIDATION", "true"),
        ("MIN_SCORE", "50"),
        ("WEBHOOK_URL", "https://hooks.example.com/signals"),
        ("MOVERS_FEED_URL", "  "),
    ])
    .unwrap();
    assert_eq!(s.port, 8080);
    assert_eq!(s.validate_top_n, 5);
    assert_eq!(s.lookup_timeout, Duration::from_secs(3));
    assert!(s.skip_validation);
    assert_eq!(s.min_score, 50);
    assert_eq!(s.webhook_url.as_deref(), Some("https://hooks.example.com/signals"));
    assert!(s.movers_feed_url.is_none());
}

#[test]
fn malformed_numbers_are_config_errors() {
    assert!(matches!(settings(&[("PORT", "eighty")]), Err(SniperError::Config(_))));
    assert!(matches!(settings(&[("MIN_SCORE", "300")]), Err(SniperError::Config(_))));
}
