//! Authenticated HTTP transport with retries
//!
//! Transient failures (network errors, 429 and 5xx other than 501) are
//! retried with exponential backoff. A 404 is reported as [`Reply::Absent`]
//! so that reads can tell "gone" apart from a failure.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::{ClientConfig, PollConfig, RetryConfig};
use crate::envelope;
use crate::error::{ClientError, Result};

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

pub(crate) const NO_BODY: Option<&()> = None;

/// Raw outcome of a request after retries
#[derive(Debug)]
pub(crate) enum Reply {
    /// The server answered 404
    Absent { body: Vec<u8> },
    Body { status: StatusCode, body: Vec<u8> },
}

/// Client for the control-plane API.
///
/// Cloning is cheap; clones share the connection pool and cancellation token.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryConfig,
    poll: PollConfig,
    cancel: CancellationToken,
}

impl Client {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Create a new client whose waits are interrupted by `cancel`
    pub fn with_cancellation(config: ClientConfig, cancel: CancellationToken) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ClientError::Config("API key must not be empty".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            retry: config.retry,
            poll: config.poll,
            cancel,
        })
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    /// Token that interrupts in-flight requests, backoff sleeps and polling
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    /// Run `future` unless the client is cancelled first
    pub(crate) async fn cancellable<F: Future>(&self, future: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ClientError::Cancelled),
            output = future => Ok(output),
        }
    }

    async fn backoff(&self, attempt: u32) -> Result<()> {
        let delay = self.retry.delay_for_attempt(attempt);
        self.cancellable(tokio::time::sleep(delay)).await
    }

    /// Send a request, retrying transient failures
    pub(crate) async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Reply>
    where
        B: Serialize + ?Sized,
    {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ClientError::Encode)?;
        let url = self.url(path);
        let mut attempt = 0u32;

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(API_KEY_HEADER, &self.api_key)
                .header(CONTENT_TYPE, "application/json");
            if let Some(bytes) = &payload {
                request = request.body(bytes.clone());
            }

            debug!("{} {} (attempt {})", method, url, attempt + 1);

            match self.cancellable(request.send()).await? {
                Ok(response) => {
                    let status = response.status();
                    if attempt < self.retry.max_retries && is_retryable(status) {
                        warn!(
                            "{} {} returned {}, retrying ({}/{})",
                            method,
                            url,
                            status.as_u16(),
                            attempt + 1,
                            self.retry.max_retries
                        );
                        self.backoff(attempt).await?;
                        attempt += 1;
                        continue;
                    }

                    let body = self
                        .cancellable(response.bytes())
                        .await?
                        .map_err(ClientError::Transport)?
                        .to_vec();
                    trace!("{} {} -> {} ({} bytes)", method, url, status, body.len());

                    if status == StatusCode::NOT_FOUND {
                        return Ok(Reply::Absent { body });
                    }
                    return Ok(Reply::Body { status, body });
                }
                Err(err) if !err.is_builder() && attempt < self.retry.max_retries => {
                    warn!(
                        "{} {} failed: {}, retrying ({}/{})",
                        method,
                        url,
                        err,
                        attempt + 1,
                        self.retry.max_retries
                    );
                    self.backoff(attempt).await?;
                    attempt += 1;
                }
                Err(err) => return Err(ClientError::Transport(err)),
            }
        }
    }

    /// GET a singleton; `None` when the server answers 404
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        match self.execute(Method::GET, path, NO_BODY).await? {
            Reply::Absent { .. } => Ok(None),
            Reply::Body { status, body } => decode(status, &body).map(Some),
        }
    }

    /// GET a collection; a missing collection is empty
    pub(crate) async fn list_json<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        match self.execute(Method::GET, path, NO_BODY).await? {
            Reply::Absent { .. } => Ok(Vec::new()),
            Reply::Body { status, body } => {
                decode::<Option<Vec<T>>>(status, &body).map(Option::unwrap_or_default)
            }
        }
    }

    /// Send `body` and decode the returned entity
    pub(crate) async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        match self.execute(method, path, Some(body)).await? {
            Reply::Absent { body } => Err(envelope::decode_error(404, &body)),
            Reply::Body { status, body } => decode(status, &body),
        }
    }

    /// Send `body` without reading a payload back
    pub(crate) async fn send_unit<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        match self.execute(method, path, body).await? {
            Reply::Absent { body } => Err(envelope::decode_error(404, &body)),
            Reply::Body { status, body } => decode_unit(status, &body),
        }
    }

    /// DELETE a singleton; an already missing resource counts as deleted
    pub(crate) async fn delete_path(&self, path: &str) -> Result<()> {
        match self.execute(Method::DELETE, path, NO_BODY).await? {
            Reply::Absent { .. } => {
                debug!("{} already absent", path);
                Ok(())
            }
            Reply::Body { status, body } => decode_unit(status, &body),
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

fn decode<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Result<T> {
    if status.is_client_error() || status.is_server_error() {
        return Err(envelope::decode_error(status.as_u16(), body));
    }
    envelope::decode_data(status.as_u16(), body)
}

fn decode_unit(status: StatusCode, body: &[u8]) -> Result<()> {
    if status.is_client_error() || status.is_server_error() {
        return Err(envelope::decode_error(status.as_u16(), body));
    }
    envelope::decode_empty(status.as_u16(), body)
}
