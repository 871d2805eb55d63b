mod common;

use chrono::{TimeZone, Utc};
use common::{raw, with_description, FailingAdapter, SlowAdapter, StaticAdapter};
use signal_sniper::aggregator::SourceStatus;
use signal_sniper::{Aggregator, SourceAdapter};
use std::time::Duration;

fn tickers(signals: &[signal_sniper::CandidateSignal]) -> Vec<&str> {
    signals.iter().map(|s| s.ticker()).collect()
}

#[tokio::test]
async fn keeps_highest_scoring_duplicate() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        // 25 (unusual) + 15 (energy) = 40
        StaticAdapter::boxed(
            "Unusual Whales",
            vec![raw("Unusual Whales", "XYZ", "watchlist", "energy")],
        ),
        // 30 (sec) + 25 (insider) + 15 (biotech) + 20 (two keywords) = 90
        StaticAdapter::boxed(
            "SEC Form 4",
            vec![with_description(
                raw("SEC Form 4", "XYZ", "insider_trading", "biotech"),
                "approval and partnership",
            )],
        ),
    ];

    let outcome = Aggregator::default().aggregate(&adapters).await;
    assert_eq!(outcome.signals.len(), 1);
    assert_eq!(outcome.signals[0].ticker(), "XYZ");
    assert_eq!(outcome.signals[0].signal_score(), 90);
    assert_eq!(outcome.signals[0].source(), "SEC Form 4");
}

#[tokio::test]
async fn output_is_ranked_and_stamped_once() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        StaticAdapter::boxed(
            "HighShortInterest",
            vec![
                raw("HighShortInterest", "AAA", "short_squeeze", "squeeze_candidate"),
                raw("HighShortInterest", "BBB", "short_squeeze", "biotech"),
            ],
        ),
        StaticAdapter::boxed(
            "Reddit WSB",
            vec![
                raw("Reddit WSB", "CCC", "social_sentiment", "reddit_hype"),
                raw("Reddit WSB", "DDD", "meme", "reddit_hype"),
            ],
        ),
    ];

    let outcome = Aggregator::default().aggregate_at(&adapters, now).await;
    let scores: Vec<u8> = outcome.signals.iter().map(|s| s.signal_score()).collect();
    assert_eq!(scores, vec![40, 35, 25, 15]);
    assert_eq!(tickers(&outcome.signals), vec!["BBB", "CCC", "AAA", "DDD"]);
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    assert!(outcome.signals.iter().all(|s| s.scraped_at() == Some(now)));
}

#[tokio::test]
async fn equal_scores_keep_emission_order() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        StaticAdapter::boxed(
            "Yahoo Trending",
            vec![raw("Yahoo Trending", "ZZZ", "trending", "trending")],
        ),
        StaticAdapter::boxed(
            "Finviz Gainers",
            vec![
                raw("Finviz Gainers", "AAA", "trending", "trending"),
                raw("Finviz Gainers", "ZZZ", "trending", "other"),
                raw("Finviz Gainers", "MMM", "trending", "trending"),
            ],
        ),
    ];

    let outcome = Aggregator::default().aggregate(&adapters).await;
    assert_eq!(tickers(&outcome.signals), vec!["ZZZ", "AAA", "MMM"]);
    assert_eq!(outcome.signals[0].source(), "Yahoo Trending");
    assert_eq!(outcome.signals[0].sector(), "trending");
}

#[tokio::test]
async fn failing_source_does_not_abort_run() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(FailingAdapter),
        StaticAdapter::boxed(
            "HighShortInterest",
            vec![
                raw("HighShortInterest", "GME", "short_squeeze", "squeeze_candidate"),
                raw("HighShortInterest", "AMC", "short_squeeze", "squeeze_candidate"),
                raw("HighShortInterest", "BBBY", "short_squeeze", "squeeze_candidate"),
            ],
        ),
    ];

    let outcome = Aggregator::default().aggregate(&adapters).await;
    assert_eq!(tickers(&outcome.signals), vec!["GME", "AMC", "BBBY"]);
    assert!(outcome.signals.iter().all(|s| s.signal_score() == 25));

    assert_eq!(outcome.sources.len(), 2);
    assert_eq!(outcome.sources[0].source, "Broken Source");
    assert!(matches!(outcome.sources[0].status, SourceStatus::Failed(_)));
    assert_eq!(outcome.sources[1].status, SourceStatus::Ok);
    assert_eq!(outcome.sources[1].candidates, 3);
    assert_eq!((outcome.succeeded(), outcome.failed()), (1, 1));
}

#[tokio::test]
async fn slow_source_is_cut_off() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(SlowAdapter(Duration::from_secs(5))),
        StaticAdapter::boxed(
            "Yahoo Trending",
            vec![raw("Yahoo Trending", "NVDA", "trending", "technology")],
        ),
    ];

    let aggregator = Aggregator::default().with_fetch_timeout(Duration::from_millis(50));
    let outcome = aggregator.aggregate(&adapters).await;
    assert_eq!(tickers(&outcome.signals), vec!["NVDA"]);
    assert!(matches!(outcome.sources[0].status, SourceStatus::Failed(_)));
}

#[tokio::test]
async fn invalid_rows_never_reach_scoring() {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![StaticAdapter::boxed(
        "Reddit WSB",
        vec![
            raw("Reddit WSB", "YOLO", "social_sentiment", "reddit_hype"),
            raw("Reddit WSB", "TOOLONG", "social_sentiment", "reddit_hype"),
            raw("Reddit WSB", "PLTR", "social_sentiment", "reddit_hype"),
        ],
    )];

    let outcome = Aggregator::default().aggregate(&adapters).await;
    assert_eq!(tickers(&outcome.signals), vec!["PLTR"]);
}

#[tokio::test]
async fn no_sources_or_no_data_is_an_empty_table() {
    let none: Vec<Box<dyn SourceAdapter>> = Vec::new();
    let outcome = Aggregator::default().aggregate(&none).await;
    assert!(outcome.signals.is_empty());
    assert!(outcome.sources.is_empty());

    let empty: Vec<Box<dyn SourceAdapter>> =
        vec![Box::new(FailingAdapter), StaticAdapter::boxed("Quiet", vec![])];
    let outcome = Aggregator::default().aggregate(&empty).await;
    assert!(outcome.signals.is_empty());
    assert_eq!(outcome.sources[1].status, SourceStatus::Empty);
    assert_eq!(outcome.failed(), 2);
}
