use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header;

use crate::{
    BackoffConfig, BackoffPolicy, ClientOptions, HttpResponse, RequestSpec, Result,
    RetryObserver, RuntimeSleeper, Sleeper, StatusError,
};

/// Classification of a single physical attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Status in `200..400`; stops the sequence with this response.
    Success(HttpResponse),
    /// Transport failure or server-side status; the sequence may continue.
    Retryable(StatusError),
    /// Client-side status; the sequence stops immediately.
    Terminal(StatusError),
}

/// Maps an HTTP status to the attempt outcome.
///
/// `200..400` succeeds, `400..500` is terminal, everything else (5xx and
/// any unexpected code) is retryable.
pub fn classify_status(status: u16, reason: impl Into<String>, body: String) -> AttemptOutcome {
    match status {
        200..=399 => AttemptOutcome::Success(HttpResponse { status, body }),
        400..=499 => AttemptOutcome::Terminal(StatusError::Client {
            status,
            reason: reason.into(),
            body,
        }),
        _ => AttemptOutcome::Retryable(StatusError::Server {
            status,
            reason: reason.into(),
            body,
        }),
    }
}

#[derive(Clone)]
/// Runs one logical GET as a bounded sequence of attempts with backoff.
pub struct RequestExecutor {
    http: reqwest::Client,
    sleeper: Arc<dyn Sleeper>,
    options: ClientOptions,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("sleeper", &self.sleeper)
            .field("options", &self.options)
            .finish()
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps an existing `reqwest` client, e.g. one with custom headers.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            sleeper: Arc::new(RuntimeSleeper),
            options: ClientOptions::default(),
        }
    }

    /// Applies client options such as the per-attempt timeout.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the backoff wait, typically with a
    /// [`TrackingSleeper`](crate::TrackingSleeper) in tests.
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Performs up to `config.max_retries + 1` attempts.
    ///
    /// Returns the first response with a status in `200..400`. A 4xx fails
    /// at once without waiting. When retries run out the error of the last
    /// attempt is returned, and no wait follows that attempt.
    pub async fn execute(
        &self,
        request: &RequestSpec,
        config: &BackoffConfig,
        observer: &dyn RetryObserver,
    ) -> Result<HttpResponse> {
        config.validate()?;
        let policy = BackoffPolicy::new(config);
        let mut delay = policy.first_delay();
        let mut attempt = 0u32;

        loop {
            #[cfg(feature = "tracing")]
            tracing::debug!(url = %request.url, attempt, "sending request");

            let error = match self.attempt(request).await {
                AttemptOutcome::Success(response) => return Ok(response),
                AttemptOutcome::Terminal(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(url = %request.url, attempt, error = %err, "request failed, not retrying");
                    return Err(err);
                }
                AttemptOutcome::Retryable(err) => err,
            };

            if attempt >= config.max_retries {
                #[cfg(feature = "tracing")]
                tracing::warn!(url = %request.url, attempts = attempt + 1, error = %error, "retries exhausted");
                return Err(error);
            }

            attempt += 1;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying request after backoff"
            );

            observer.on_retry(attempt, delay);
            self.sleeper.sleep(delay).await;
            delay = policy.next_delay(delay);
        }
    }

    async fn attempt(&self, request: &RequestSpec) -> AttemptOutcome {
        let timeout = request
            .timeout
            .unwrap_or(Duration::from_millis(self.options.timeout_ms));

        // On WASM, reqwest uses AbortController for the timeout.
        let response = self
            .http
            .get(&request.url)
            .header(header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::Retryable(StatusError::Transport(err)),
        };

        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        match response.text().await {
            Ok(body) => classify_status(status.as_u16(), reason, body),
            Err(err) => AttemptOutcome::Retryable(StatusError::Transport(err)),
        }
    }
}
