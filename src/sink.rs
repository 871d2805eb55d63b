use crate::error::Result;
use crate::types::CandidateSignal;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

/// Posts each run's table as a JSON array of flat signal objects.
#[derive(Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub async fn send_signals(&self, signals: &[CandidateSignal]) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(signals)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("[Webhook] Delivered {} signal(s)", signals.len());
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!("[Webhook] Delivery failed: {} - {}", status, body);
        }
        Ok(())
    }
}
