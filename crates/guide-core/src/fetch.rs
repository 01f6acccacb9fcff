//! Sheet download with bounded retries.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("empty response body")]
    EmptyBody,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("fetch failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: Box<FetchError> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(300),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt `attempt` (1-based): `initial × 2^(attempt-1)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor)
    }
}

/// GET `url` and return the body text.
///
/// A non-2xx status, a blank body or an attempt running past
/// `attempt_timeout` all count as a failed attempt. The timed-out request is
/// dropped, which aborts it. After `max_attempts` failures the last error is
/// returned wrapped in [`FetchError::Exhausted`].
pub async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<String, FetchError> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        let err = match tokio::time::timeout(policy.attempt_timeout, fetch_once(client, url)).await
        {
            Ok(Ok(body)) => {
                tracing::debug!(url, attempt, bytes = body.len(), "sheet fetched");
                return Ok(body);
            }
            Ok(Err(e)) => e,
            Err(_) => FetchError::Timeout(policy.attempt_timeout),
        };

        if attempt >= attempts {
            return Err(FetchError::Exhausted {
                attempts,
                last: Box::new(err),
            });
        }

        let delay = policy.backoff_delay(attempt);
        tracing::warn!(
            "sheet fetch retry {}/{} after error: {} (sleep {:?})",
            attempt,
            attempts,
            err,
            delay
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

async fn fetch_once(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }
    Ok(body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
