//! Client configuration
//!
//! Settings are resolved in the order: explicit value, environment, default.
//! The API key has no default.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Environment variable holding the control-plane base URL
pub const ENDPOINT_ENV: &str = "THECLOUD_ENDPOINT";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "THECLOUD_API_KEY";

/// Endpoint used when neither configuration nor environment provide one
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Configuration for the [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the control plane.
    pub endpoint: String,
    /// Key sent as `X-API-Key` on every request.
    pub api_key: String,
    /// Timeout applied to each individual attempt.
    pub request_timeout: Duration,
    /// Retry policy for transient failures.
    pub retry: RetryConfig,
    /// Polling policy for asynchronous completion.
    pub poll: PollConfig,
}

impl ClientConfig {
    /// Create a configuration with default timeouts.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            request_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
            poll: PollConfig::default(),
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `THECLOUD_ENDPOINT`: control-plane URL (default: "http://localhost:8080")
    /// - `THECLOUD_API_KEY`: API key (required)
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None)
    }

    /// Resolve a configuration, preferring explicit values over the environment.
    ///
    /// Empty strings count as unset.
    pub fn resolve(endpoint: Option<String>, api_key: Option<String>) -> Result<Self> {
        let endpoint = non_empty(endpoint)
            .or_else(|| env_value(ENDPOINT_ENV))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "endpoint must be an http(s) URL, got {:?}",
                endpoint
            )));
        }

        let api_key = non_empty(api_key)
            .or_else(|| env_value(API_KEY_ENV))
            .ok_or_else(|| {
                ClientError::Config(format!(
                    "missing API key: set the api_key option or the {} environment variable",
                    API_KEY_ENV
                ))
            })?;

        Ok(Self::new(endpoint, api_key))
    }

    /// Set the per-attempt request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Set the polling policy.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn env_value(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

/// Retry configuration for transient HTTP failures
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,

    /// Lower bound for the backoff delay
    pub min_wait: Duration,

    /// Upper bound for the backoff delay
    pub max_wait: Duration,

    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            min_wait: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero based), clamped to `[min_wait, max_wait]`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.min(i32::MAX as u32) as i32);
        let secs = self.min_wait.as_secs_f64() * factor;
        let max = self.max_wait.max(self.min_wait);
        if !secs.is_finite() || secs >= max.as_secs_f64() {
            return max;
        }
        Duration::from_secs_f64(secs).max(self.min_wait)
    }
}

/// Polling configuration for operations that complete asynchronously
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between probes
    pub interval: Duration,

    /// Overall deadline
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            timeout: Duration::from_secs(10 * 60),
        }
    }
}
