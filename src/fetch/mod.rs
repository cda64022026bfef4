//! Rate-limited fetch executor.
//!
//! Performs one provider HTTP call, classifies the outcome, and applies
//! backoff. Providers signal throttling with HTTP 429 (carrying a
//! provider-specific reset header) or HTTP 509 (bandwidth/quota exceeded,
//! a distinct signal with its own fixed sleep). Authentication is already
//! embedded in the request URL by the caller; the executor's only side
//! effects are the HTTP call itself and wall-clock sleeping.
//!
//! Short throttle windows are slept through in place. A window longer
//! than [`RetryPolicy::max_local_wait`] is a harder signal: the executor
//! surfaces [`ChainDataError::Throttled`] so the caller can consider
//! switching providers instead of blocking.

use std::time::Duration;

use chrono::Utc;
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::DayCache;
use crate::errors::ChainDataError;

/// Where a provider reports its throttling window on a 429 response.
///
/// Header names vary per provider, so this is adapter-supplied
/// configuration rather than a constant in the executor.
#[derive(Clone, Debug)]
pub enum ThrottleHeader {
    /// Header carries an absolute UNIX reset timestamp;
    /// the wait is `reset - now`.
    ResetTimestamp(&'static str),

    /// Header carries a relative retry-after second count.
    RetryAfterSeconds(&'static str),
}

/// Retry and backoff policy for a provider endpoint.
///
/// Explicit and injectable so tests (and cautious callers) can bound the
/// executor's patience.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// In-place attempts before surfacing `Throttled` to the caller
    pub max_attempts: u32,

    /// Wait applied when the throttle header is missing, unparsable,
    /// or already in the past
    pub fallback_wait: Duration,

    /// Waits above this are surfaced to the caller for failover instead
    /// of slept locally
    pub max_local_wait: Duration,

    /// Fixed sleep after HTTP 509
    pub quota_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 8,
            fallback_wait: Duration::from_secs(5),
            max_local_wait: Duration::from_secs(10),
            quota_wait: Duration::from_secs(6),
        }
    }
}

/// Executes single provider HTTP calls under the retry/backoff contract.
pub struct FetchExecutor {
    client: Client,
    provider: &'static str,
    throttle: ThrottleHeader,
    policy: RetryPolicy,
}

impl FetchExecutor {
    /// Create an executor with the default retry policy.
    pub fn new(provider: &'static str, throttle: ThrottleHeader) -> Self {
        Self::with_policy(provider, throttle, RetryPolicy::default())
    }

    /// Create an executor with an explicit retry policy.
    pub fn with_policy(
        provider: &'static str,
        throttle: ThrottleHeader,
        policy: RetryPolicy,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            provider,
            throttle,
            policy,
        }
    }

    /// Fetch and decode one URL, applying the retry/backoff contract.
    ///
    /// - 200/203 (some providers use 203 for cached-but-valid responses):
    ///   decode the body; an undecodable body is non-retryable.
    /// - 429: sleep the provider-reported window and retry, or surface
    ///   `Throttled` when the window exceeds the local-wait cap.
    /// - 509: sleep the fixed quota wait and retry.
    /// - anything else: non-retryable `UnexpectedStatus`.
    pub async fn fetch_json(&self, url: &str) -> Result<Value, ChainDataError> {
        for attempt in 1..=self.policy.max_attempts {
            let response = self.client.get(url).send().await?;
            let status = response.status().as_u16();

            match status {
                200 | 203 => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        ChainDataError::MalformedResponse {
                            provider: self.provider.to_string(),
                            message: format!("undecodable body: {}", e),
                        }
                    });
                }
                429 => {
                    let wait = self.throttle_wait(response.headers());
                    if wait > self.policy.max_local_wait {
                        warn!(
                            provider = self.provider,
                            wait_secs = wait.as_secs(),
                            "throttle window too long to sleep through, reporting to caller"
                        );
                        return Err(self.throttled());
                    }
                    debug!(
                        provider = self.provider,
                        attempt,
                        wait_secs = wait.as_secs(),
                        "throttled, backing off"
                    );
                    tokio::time::sleep(wait).await;
                }
                509 => {
                    warn!(provider = self.provider, attempt, "bandwidth limit exceeded, retrying");
                    tokio::time::sleep(self.policy.quota_wait).await;
                }
                other => {
                    return Err(ChainDataError::UnexpectedStatus {
                        provider: self.provider.to_string(),
                        status: other,
                    });
                }
            }
        }

        Err(self.throttled())
    }

    /// Fetch through the cache: serve a cached document when present,
    /// otherwise fetch live and record the result.
    pub async fn fetch_cached(
        &self,
        cache: &DayCache,
        key: &str,
        url: &str,
    ) -> Result<Value, ChainDataError> {
        if let Some(hit) = cache.get(key) {
            return Ok(hit);
        }

        let value = self.fetch_json(url).await?;
        cache.put(key, &value);
        Ok(value)
    }

    /// Compute the backoff wait from the provider's throttle header.
    fn throttle_wait(&self, headers: &HeaderMap) -> Duration {
        let (name, absolute) = match self.throttle {
            ThrottleHeader::ResetTimestamp(name) => (name, true),
            ThrottleHeader::RetryAfterSeconds(name) => (name, false),
        };

        let parsed = headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i64>().ok());

        let seconds = match parsed {
            Some(reset) if absolute => reset - Utc::now().timestamp(),
            Some(seconds) => seconds,
            None => {
                debug!(
                    provider = self.provider,
                    header = name,
                    "throttle header missing or unparsable, using fallback wait"
                );
                return self.policy.fallback_wait;
            }
        };

        if seconds <= 0 {
            return self.policy.fallback_wait;
        }

        Duration::from_secs(seconds as u64)
    }

    fn throttled(&self) -> ChainDataError {
        ChainDataError::Throttled {
            provider: self.provider.to_string(),
        }
    }
}
