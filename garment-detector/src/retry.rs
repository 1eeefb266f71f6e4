use crate::config::StrategyConfig;
use crate::traits::InferenceClient;
use crate::types::{InferenceRequest, Result};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use std::time::Duration;
use tracing::warn;

/// Invokes the client, retrying transient failures with exponential backoff.
///
/// `build_request` is called once per attempt so no request is ever reused.
/// With `max_retries == 0` this is a single plain call.
pub async fn invoke_with_retry<F>(client: &dyn InferenceClient, build_request: F, config: &StrategyConfig) -> Result<String>
where
    F: Fn() -> InferenceRequest + Send + Sync,
{
    let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
        current_interval: Duration::from_millis(config.retry_delay_ms),
        initial_interval: Duration::from_millis(config.retry_delay_ms),
        max_interval: Duration::from_millis(config.retry_delay_ms.saturating_mul(32)),
        multiplier: 2.0,
        max_elapsed_time: None,
        ..Default::default()
    };

    let mut attempt: u32 = 0;
    loop {
        let request = build_request();
        match client.invoke(&request).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                let Some(delay) = backoff.next_backoff() else {
                    return Err(e);
                };
                attempt += 1;
                warn!(
                    "Attempt {} of {} task failed ({}), retrying in {:?}",
                    attempt,
                    request.task,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
