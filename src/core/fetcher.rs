//! Retry-with-backoff HTTP acquisition.
//!
//! The retry loop is an explicit state machine: [`RetryState::Attempting`]
//! carries the 0-indexed attempt number, and [`RetryState::advance`] decides
//! whether the next state is another attempt, success, or exhaustion. The
//! fetcher only executes transitions and sleeps between them.

use crate::core::{Sleeper, Transport};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(EtlError::InvalidConfigValueError {
                field: "max_attempts".to_string(),
                value: max_attempts.to_string(),
                reason: "At least one attempt is required".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            base_delay,
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after failed attempt `attempt` (0-indexed):
    /// `base_delay * 2^attempt`, saturating instead of overflowing.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Attempting(u32),
    Succeeded,
    Exhausted,
}

impl RetryState {
    pub fn start() -> Self {
        RetryState::Attempting(0)
    }

    /// Terminal states are absorbing.
    pub fn advance(self, succeeded: bool, policy: &RetryPolicy) -> Self {
        match self {
            RetryState::Attempting(_) if succeeded => RetryState::Succeeded,
            RetryState::Attempting(attempt) if attempt + 1 < policy.max_attempts() => {
                RetryState::Attempting(attempt + 1)
            }
            RetryState::Attempting(_) => RetryState::Exhausted,
            terminal => terminal,
        }
    }
}

/// Returned when every attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub url: String,
    pub attempts: u32,
    pub reason: String,
}

impl From<FetchFailure> for EtlError {
    fn from(failure: FetchFailure) -> Self {
        EtlError::TransportFailure {
            url: failure.url,
            attempts: failure.attempts,
            reason: failure.reason,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status from {}: {}", url, response.status());
        let response = response.error_for_status()?;
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

pub struct Fetcher<T: Transport = HttpTransport, Z: Sleeper = TokioSleeper> {
    transport: T,
    sleeper: Z,
    policy: RetryPolicy,
}

impl Fetcher<HttpTransport, TokioSleeper> {
    pub fn http(policy: RetryPolicy, timeout: Duration) -> Result<Self> {
        Ok(Self::new(HttpTransport::new(timeout)?, TokioSleeper, policy))
    }
}

impl<T: Transport, Z: Sleeper> Fetcher<T, Z> {
    pub fn new(transport: T, sleeper: Z, policy: RetryPolicy) -> Self {
        Self {
            transport,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url`, retrying with exponential backoff. Never returns a
    /// transport error directly; exhaustion is reported as [`FetchFailure`].
    pub async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchFailure> {
        let mut state = RetryState::start();
        let mut payload = None;
        let mut last_error = String::new();

        while let RetryState::Attempting(attempt) = state {
            tracing::info!(
                url,
                attempt = attempt + 1,
                max_attempts = self.policy.max_attempts(),
                "Fetching dataset"
            );

            let outcome = self.transport.get(url).await;
            state = state.advance(outcome.is_ok(), &self.policy);

            match outcome {
                Ok(body) => {
                    tracing::debug!(url, bytes = body.len(), "Fetch succeeded");
                    payload = Some(body);
                }
                Err(e) => {
                    last_error = e.to_string();
                    if let RetryState::Attempting(_) = state {
                        let delay = self.policy.delay_for(attempt);
                        tracing::warn!(
                            url,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "Attempt failed, retrying"
                        );
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        match (state, payload) {
            (RetryState::Succeeded, Some(body)) => Ok(body),
            _ => {
                tracing::warn!(
                    url,
                    attempts = self.policy.max_attempts(),
                    error = %last_error,
                    "Giving up on dataset fetch"
                );
                Err(FetchFailure {
                    url: url.to_string(),
                    attempts: self.policy.max_attempts(),
                    reason: last_error,
                })
            }
        }
    }
}
