//! Resilient HTTP transport: bounded timeouts, retries with
//! exponential backoff and jitter, and rate-limit escalation.

use rand::Rng;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Upper bound for a single attempt, connection setup included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Total attempts per request: one initial try plus two retries.
pub const MAX_ATTEMPTS: u32 = 3;

const BASE_RETRY_DELAY_MS: u64 = 1_000;
const MAX_RETRY_DELAY_MS: u64 = 8_000;
const JITTER_MS: u64 = 500;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {0}")]
    HttpStatus(StatusCode),

    #[error("rate limited (HTTP 429)")]
    RateLimited,

    #[error("network error: {0}")]
    Network(String),

    #[error("all {attempts} fetch attempts failed: {last}")]
    AllAttemptsFailed {
        attempts: u32,
        #[source]
        last: Box<TransportError>,
    },
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Backoff delay for a 0-indexed attempt: 1s, 2s, 4s doubling, plus up
/// to 500ms of jitter, never more than 8s in total.
pub fn retry_delay(attempt: u32) -> Duration {
    let exponential = BASE_RETRY_DELAY_MS.saturating_mul(2u64.saturating_pow(attempt));
    let jitter = rand::thread_rng().gen_range(0..JITTER_MS);
    Duration::from_millis((exponential.saturating_add(jitter)).min(MAX_RETRY_DELAY_MS))
}

/// Sends `request` until it succeeds or the attempt budget runs out.
///
/// Every attempt is bounded by [`FETCH_TIMEOUT`]. A 429 response sleeps
/// twice the computed backoff before the next attempt; any other
/// non-success status fails the attempt outright. When everything
/// fails, the last underlying error is surfaced with the attempt count.
pub async fn send_resilient(request: RequestBuilder) -> Result<Response> {
    let mut last_error = TransportError::Network("no attempt was made".to_string());

    for attempt in 0..MAX_ATTEMPTS {
        let req = match request.try_clone() {
            Some(req) => req,
            None => {
                return Err(TransportError::Network(
                    "request body is not cloneable".to_string(),
                ))
            }
        };

        match req.timeout(FETCH_TIMEOUT).send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }
                if status == StatusCode::TOO_MANY_REQUESTS {
                    warn!(
                        "rate limited on attempt {}/{}, backing off harder",
                        attempt + 1,
                        MAX_ATTEMPTS
                    );
                    last_error = TransportError::RateLimited;
                    tokio::time::sleep(retry_delay(attempt) * 2).await;
                    continue;
                }
                last_error = TransportError::HttpStatus(status);
            }
            Err(err) => {
                last_error = if err.is_timeout() {
                    TransportError::Timeout(FETCH_TIMEOUT)
                } else {
                    TransportError::Network(err.to_string())
                };
            }
        }

        warn!(
            "fetch attempt {}/{} failed: {}",
            attempt + 1,
            MAX_ATTEMPTS,
            last_error
        );

        if attempt + 1 < MAX_ATTEMPTS {
            let delay = retry_delay(attempt);
            debug!("retrying in {}ms", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
    }

    Err(TransportError::AllAttemptsFailed {
        attempts: MAX_ATTEMPTS,
        last: Box::new(last_error),
    })
}
