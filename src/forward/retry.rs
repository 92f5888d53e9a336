use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{error, info, warn};

use super::error::{ForwardError, ForwardResult};
use crate::constants::ERROR_BODY_PREVIEW_CHARS;

/// Deliver one batch payload with bounded exponential-backoff retry.
///
/// Timeouts, transport failures and 5XX responses are retried up to
/// `max_retries` attempts, doubling the delay after each failure. A 4XX
/// response is terminal and returns immediately.
pub async fn send_batch_with_retry(
    client: &Client,
    endpoint: &str,
    bearer_token: &str,
    payload: &str,
    max_retries: u64,
    base_delay: Duration,
) -> ForwardResult<()> {
    let mut attempt: u64 = 0;

    loop {
        let start_time = Instant::now();

        match send_request(client, endpoint, bearer_token, payload).await {
            Ok(()) => {
                info!(
                    "Batch delivered on attempt {}, elapsed: {:?}",
                    attempt + 1,
                    start_time.elapsed()
                );
                return Ok(());
            }
            Err(e) if !e.is_retryable() => {
                error!("Stopped: {}", e);
                return Err(e);
            }
            Err(e) => {
                if matches!(e, ForwardError::Timeout) {
                    warn!("Request timed out after 30 seconds");
                }

                attempt += 1;
                if attempt >= max_retries {
                    error!("Attempts exhausted ({}). Last error: {}", max_retries, e);
                    return Err(e);
                }

                let delay = backoff_delay(base_delay, attempt);
                warn!(
                    "Attempt {} failed ({}). Retrying in {} ms...",
                    attempt,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

/// Delay before the retry following failure number `attempt` (1-based):
/// `base_delay * 2^(attempt - 1)`.
pub(super) fn backoff_delay(base_delay: Duration, attempt: u64) -> Duration {
    let exponent = (attempt - 1).min(31) as u32;
    base_delay.saturating_mul(1 << exponent)
}

/// Send a single HTTP request
async fn send_request(
    client: &Client,
    endpoint: &str,
    bearer_token: &str,
    payload: &str,
) -> ForwardResult<()> {
    let response = client
        .post(endpoint)
        .header("Authorization", format!("Bearer {}", bearer_token))
        .header("Content-Type", "application/x-ndjson")
        .body(payload.to_owned())
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        // Consume the response body
        let _ = response.text().await;
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(ForwardError::server_error(
        status.as_u16(),
        truncate_body(body),
    ))
}

/// Keep at most the first 1024 characters of an error response body.
pub(super) fn truncate_body(body: String) -> String {
    if body.chars().count() <= ERROR_BODY_PREVIEW_CHARS {
        return body;
    }

    let mut truncated: String = body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}
