use std::time::{Duration, Instant};

use anyhow::Result;
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use super::batch::build_batches;
use super::retry::send_batch_with_retry;
use crate::config::Config;
use crate::constants::REQUEST_TIMEOUT_SECS;

/// HTTP client for forwarding event batches to the collect endpoint
pub struct Forwarder {
    client: Client,
    collect_url: String,
    bearer_token: String,
    max_batch_bytes: usize,
    max_retries: u64,
    base_delay: Duration,
}

impl Forwarder {
    /// Create a new Forwarder from the startup configuration
    pub fn try_new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Forwarder {
            client,
            collect_url: config.collect_url.clone(),
            bearer_token: config.bearer_token.clone(),
            max_batch_bytes: config.max_batch_bytes,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        })
    }

    /// Forward one invocation's messages, returning the number sent.
    ///
    /// Batches are delivered strictly sequentially in order; the first
    /// terminal failure or retry exhaustion aborts the remaining batches
    /// and propagates to the caller.
    pub async fn forward(&self, messages: Vec<Value>) -> Result<usize> {
        let start_time = Instant::now();

        let batches = build_batches(messages, self.max_batch_bytes);
        if batches.is_empty() {
            warn!("No valid messages to send after filtering");
            return Ok(0);
        }

        let batch_count = batches.len();
        let mut total_sent = 0;

        for (index, batch) in batches.iter().enumerate() {
            send_batch_with_retry(
                &self.client,
                &self.collect_url,
                &self.bearer_token,
                &batch.payload(),
                self.max_retries,
                self.base_delay,
            )
            .await?;
            total_sent += batch.len();

            if batch_count > 1 {
                info!(
                    "Successfully sent batch {}/{} ({} messages) to {}",
                    index + 1,
                    batch_count,
                    batch.len(),
                    self.collect_url
                );
            }
        }

        info!(
            "Successfully sent {} messages in {} batch(es) to {}, elapsed: {:?}",
            total_sent,
            batch_count,
            self.collect_url,
            start_time.elapsed()
        );

        Ok(total_sent)
    }
}
