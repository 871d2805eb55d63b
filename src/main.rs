use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use signal_sniper::{
    config::Settings,
    pipeline::{Pipeline, RunReport},
    sink::WebhookSink,
    sources::{FeedConfig, JsonFeedAdapter, RedditAdapter},
    types::{CandidateSignal, SignalType},
    yahoo::YahooLookup,
    Aggregator, ExistenceValidator, Scorer, TickerFilter,
};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::MissedTickBehavior;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub struct AppState {
    pipeline: Pipeline,
    latest: RwLock<Option<RunReport>>,
    runs: RwLock<u64>,
    signal_tx: Option<mpsc::Sender<Vec<CandidateSignal>>>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("signal_sniper=info")),
        )
        .init();

    info!("==================================================");
    info!("  SIGNAL SNIPER");
    info!("==================================================");

    let settings = Settings::from_env()?;
    let pipeline = build_pipeline(&settings)?;
    info!("Sources: {:?}", pipeline.adapter_names());
    info!(
        "Validation: {}",
        if settings.skip_validation {
            "disabled".to_string()
        } else {
            format!(
                "top {} via Yahoo ({} concurrent)",
                settings.validate_top_n, settings.validation_concurrency
            )
        }
    );

    let signal_tx = match &settings.webhook_url {
        Some(url) => {
            let sink = WebhookSink::new(url, settings.fetch_timeout)?;
            let (tx, rx) = mpsc::channel::<Vec<CandidateSignal>>(16);
            tokio::spawn(webhook_forwarder(sink, rx));
            info!("Webhook sink: {}", url);
            Some(tx)
        }
        None => {
            warn!("WEBHOOK_URL not set, results are only served over HTTP");
            None
        }
    };

    let state = Arc::new(AppState {
        pipeline,
        latest: RwLock::new(None),
        runs: RwLock::new(0),
        signal_tx,
    });

    let scan_state = Arc::clone(&state);
    let interval = settings.scan_interval;
    tokio::spawn(async move {
        scan_loop(scan_state, interval).await;
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/signals", get(signals))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", settings.port)).await?;
    info!("Server running on port {}", settings.port);
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_pipeline(settings: &Settings) -> signal_sniper::Result<Pipeline> {
    let aggregator = Aggregator::new(TickerFilter::default(), Scorer::default())
        .with_fetch_timeout(settings.fetch_timeout);

    let mut pipeline = Pipeline::new(aggregator).with_min_score(settings.min_score);

    let feeds = [
        (
            "HighShortInterest",
            &settings.short_interest_feed_url,
            SignalType::ShortSqueeze,
            "squeeze_candidate",
        ),
        (
            "MarketWatch Movers",
            &settings.movers_feed_url,
            SignalType::PremarketMover,
            "movers",
        ),
        (
            "Yahoo Trending",
            &settings.trending_feed_url,
            SignalType::Trending,
            "trending",
        ),
    ];
    for (name, url, signal_type, default_sector) in feeds {
        if let Some(url) = url {
            let config = FeedConfig {
                name: name.to_string(),
                url: url.clone(),
                signal_type,
                default_sector: default_sector.to_string(),
                max_rows: None,
            };
            let adapter = JsonFeedAdapter::new(config, settings.fetch_timeout)?;
            pipeline = pipeline.with_adapter(Box::new(adapter));
        }
    }

    pipeline = pipeline.with_adapter(Box::new(RedditAdapter::new(
        &settings.reddit_subreddit,
        settings.reddit_post_limit,
        settings.fetch_timeout,
    )?));

    if !settings.skip_validation {
        let validator = ExistenceValidator::new(
            settings.validate_top_n,
            settings.validation_concurrency,
            settings.lookup_timeout,
        );
        let lookup = YahooLookup::new(settings.lookup_timeout)?;
        pipeline = pipeline.with_validation(validator, Arc::new(lookup));
    }

    Ok(pipeline)
}

/// Failed runs are not retried; the next tick starts a fresh run. A run that
/// overruns the interval pushes the schedule back instead of bursting.
async fn scan_loop(state: Arc<AppState>, interval: std::time::Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;

        let report = state.pipeline.run_report().await;
        *state.runs.write().await += 1;

        if let Some(tx) = &state.signal_tx {
            if !report.signals.is_empty() && tx.send(report.signals.clone()).await.is_err() {
                warn!("Webhook forwarder stopped, dropping results");
            }
        }
        *state.latest.write().await = Some(report);
    }
}

async fn webhook_forwarder(sink: WebhookSink, mut rx: mpsc::Receiver<Vec<CandidateSignal>>) {
    while let Some(signals) = rx.recv().await {
        if let Err(e) = sink.send_signals(&signals).await {
            warn!("[Webhook] Failed to deliver {} signal(s): {}", signals.len(), e);
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "signal-sniper",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

async fn status(State(s): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let runs = *s.runs.read().await;
    let latest = s.latest.read().await;

    Json(serde_json::json!({
        "runs": runs,
        "sources": s.pipeline.adapter_names(),
        "lastRun": latest.as_ref().map(|r| serde_json::json!({
            "startedAt": r.started_at.to_rfc3339(),
            "finishedAt": r.finished_at.to_rfc3339(),
            "aggregated": r.aggregated,
            "validated": r.validated,
            "signals": r.signals.len(),
            "sources": r.sources,
        })),
    }))
}

async fn signals(State(s): State<Arc<AppState>>) -> Json<Vec<CandidateSignal>> {
    let latest = s.latest.read().await;
    Json(latest.as_ref().map(|r| r.signals.clone()).unwrap_or_default())
}
