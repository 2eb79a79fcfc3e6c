use std::cell::Cell;
use std::fmt;
use std::time::Duration;

use crate::{
    decode_status, format_retry_message, BackoffConfig, PresentationState, RequestExecutor,
    RequestSpec, StatusError, StatusPayload, StatusView,
};

/// Path of the device status endpoint.
pub const STATUS_PATH: &str = "/api/status";

/// Version text shown when the status could not be fetched.
pub const VERSION_PLACEHOLDER: &str = "N/A";

/// Joins [`STATUS_PATH`] onto a base URL.
///
/// Example: `"http://192.168.1.50/"` → `"http://192.168.1.50/api/status"`
pub fn status_url(base_url: &str) -> String {
    format!("{}{STATUS_PATH}", base_url.trim().trim_end_matches('/'))
}

/// Builds the status URL for a device reachable by host name or address.
pub fn device_status_url(host: &str) -> String {
    status_url(&format!("http://{}", host.trim()))
}

/// Logical phase of the poller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Loading,
    Success,
    Failed,
}

/// How a poll cycle ended.
#[derive(Debug)]
pub enum PollOutcome {
    Success(StatusPayload),
    Failed(StatusError),
    /// A newer cycle was started before this one finished; its result was
    /// discarded without touching the view.
    Superseded,
}

/// Drives one status poll cycle at a time against a [`StatusView`].
///
/// All state lives in `Cell`s: the poller runs on a single cooperative
/// thread, like the page it backs. Starting a new cycle while another is in
/// flight does not cancel the old one, but only the newest cycle may write
/// to the view.
pub struct StatusPoller<V> {
    executor: RequestExecutor,
    request: RequestSpec,
    backoff: BackoffConfig,
    view: V,
    phase: Cell<PollPhase>,
    generation: Cell<u64>,
}

impl<V> fmt::Debug for StatusPoller<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusPoller")
            .field("executor", &self.executor)
            .field("request", &self.request)
            .field("backoff", &self.backoff)
            .field("phase", &self.phase.get())
            .field("generation", &self.generation.get())
            .finish()
    }
}

impl<V: StatusView> StatusPoller<V> {
    /// Creates an idle poller for `status_url` using
    /// [`BackoffConfig::status_polling`].
    pub fn new(executor: RequestExecutor, status_url: impl Into<String>, view: V) -> Self {
        Self {
            executor,
            request: RequestSpec::get(status_url),
            backoff: BackoffConfig::status_polling(),
            view,
            phase: Cell::new(PollPhase::Idle),
            generation: Cell::new(0),
        }
    }

    /// Creates a poller for the device at `host`.
    pub fn from_host(host: &str, view: V) -> Self {
        Self::new(RequestExecutor::new(), device_status_url(host), view)
    }

    /// Creates a poller from environment variables.
    ///
    /// Reads:
    /// - `HADASH_BASE_URL` — base URL of the device (e.g. `http://192.168.1.50`)
    /// - `HADASH_TIMEOUT_MS` — optional per-attempt timeout in milliseconds
    ///
    /// **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env(view: V) -> std::result::Result<Self, String> {
        Self::from_vars(view, |name| std::env::var(name).ok())
    }

    /// Same as [`StatusPoller::from_env`], reading variables through `var`.
    pub fn from_vars(
        view: V,
        var: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, String> {
        let base_url = var("HADASH_BASE_URL")
            .ok_or_else(|| "missing HADASH_BASE_URL environment variable".to_owned())?;
        if base_url.trim().is_empty() {
            return Err("HADASH_BASE_URL is set but empty".to_owned());
        }

        let mut options = crate::ClientOptions::default();
        if let Some(raw) = var("HADASH_TIMEOUT_MS") {
            options.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|err| format!("HADASH_TIMEOUT_MS is not a valid integer: {err}"))?;
        }

        let executor = RequestExecutor::new().with_options(options);
        Ok(Self::new(executor, status_url(&base_url), view))
    }

    /// Overrides the backoff template cloned into every cycle.
    pub fn with_backoff(mut self, config: BackoffConfig) -> Self {
        self.backoff = config;
        self
    }

    /// Overrides the per-attempt timeout of the status request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request.timeout = Some(timeout);
        self
    }

    pub fn phase(&self) -> PollPhase {
        self.phase.get()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn request(&self) -> &RequestSpec {
        &self.request
    }

    /// Runs the first cycle when the page becomes ready.
    ///
    /// Returns `None` without doing anything once the poller has left
    /// [`PollPhase::Idle`].
    pub async fn start(&self) -> Option<PollOutcome> {
        if self.phase.get() != PollPhase::Idle {
            return None;
        }
        Some(self.run_cycle().await)
    }

    /// Manual retry: starts a fresh, independent cycle.
    pub async fn retry(&self) -> PollOutcome {
        self.run_cycle().await
    }

    async fn run_cycle(&self) -> PollOutcome {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.phase.set(PollPhase::Loading);
        self.view.render(&PresentationState::Loading);

        let backoff = self.backoff.clone();
        let on_retry = |attempt: u32, delay: Duration| {
            if self.is_current(generation) {
                self.view.render(&PresentationState::Warning(format_retry_message(
                    attempt, delay,
                )));
            }
        };

        let result = self
            .executor
            .execute(&self.request, &backoff, &on_retry)
            .await
            .and_then(|response| decode_status(&response));

        if !self.is_current(generation) {
            #[cfg(feature = "tracing")]
            tracing::debug!(generation, "discarding result of superseded poll cycle");
            return PollOutcome::Superseded;
        }

        match result {
            Ok(payload) => {
                #[cfg(feature = "tracing")]
                tracing::info!(status = %payload.status, version = %payload.version, "status poll succeeded");

                self.phase.set(PollPhase::Success);
                self.view
                    .render(&PresentationState::Success(payload.status.clone()));
                self.view.set_version(&payload.version);
                PollOutcome::Success(payload)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::error!(url = %self.request.url, error = %err, "status poll failed");

                self.phase.set(PollPhase::Failed);
                self.view.render(&PresentationState::Error);
                self.view.set_version(VERSION_PLACEHOLDER);
                PollOutcome::Failed(err)
            }
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }
}
