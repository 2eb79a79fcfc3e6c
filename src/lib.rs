//! `hadash-status` is a resilient status polling client for the HA-Dash
//! configuration page.
//!
//! It fetches `GET /api/status` from the device, retries transient failures
//! with exponential backoff, and drives a small presentation state machine:
//! - [`RequestExecutor::execute`] runs one logical request as bounded attempts
//! - [`decode_status`] turns a successful body into a [`StatusPayload`]
//! - [`StatusPresenter`] renders [`PresentationState`] onto UI elements
//! - [`StatusPoller`] ties the cycle together and exposes manual retry

mod backoff;
mod decode;
mod error;
mod executor;
mod observer;
mod options;
mod poller;
mod presenter;
mod sleeper;
mod types;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use backoff::{BackoffPolicy, Delays};
pub use decode::{decode_json, decode_status};
pub use error::StatusError;
pub use executor::{classify_status, AttemptOutcome, RequestExecutor};
pub use observer::{NoopObserver, RetryObserver};
pub use options::{BackoffConfig, ClientOptions};
pub use poller::{
    device_status_url, status_url, PollOutcome, PollPhase, StatusPoller, STATUS_PATH,
    VERSION_PLACEHOLDER,
};
pub use presenter::{
    format_retry_message, ElementIds, ElementSink, ElementState, MemoryElements,
    PresentationState, StatusKind, StatusPresenter, StatusView,
};
pub use sleeper::{InstantSleeper, RuntimeSleeper, SleepFuture, Sleeper, TrackingSleeper};
pub use types::{HttpResponse, RequestSpec, StatusPayload};

pub type Result<T> = std::result::Result<T, StatusError>;
