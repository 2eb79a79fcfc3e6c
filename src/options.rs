use std::time::Duration;

use crate::{Result, StatusError};

/// Retry and backoff settings for one logical request.
///
/// The same value is reused read-only by every attempt of a sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct BackoffConfig {
    /// Retries after the initial attempt; `max_retries + 1` attempts at most.
    pub max_retries: u32,
    /// Wait before the first retry, in milliseconds.
    pub initial_delay_ms: u64,
    /// Upper bound for every later wait, in milliseconds.
    pub max_delay_ms: u64,
    /// Growth factor applied after each wait. Must be `>= 1`.
    pub backoff_multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl BackoffConfig {
    /// Settings used by the status page poller: a tighter 10 s ceiling.
    pub fn status_polling() -> Self {
        Self {
            max_delay_ms: 10_000,
            ..Self::default()
        }
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    /// Rejects settings that would make the delay sequence meaningless.
    ///
    /// `initial_delay_ms > max_delay_ms` is accepted: every wait, the first
    /// included, is clamped to the ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.initial_delay_ms == 0 {
            return Err(StatusError::Config(
                "initial_delay_ms must be greater than zero".to_owned(),
            ));
        }
        if self.max_delay_ms == 0 {
            return Err(StatusError::Config(
                "max_delay_ms must be greater than zero".to_owned(),
            ));
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err(StatusError::Config(format!(
                "backoff_multiplier must be a finite number >= 1, got {}",
                self.backoff_multiplier
            )));
        }
        Ok(())
    }
}

/// Configures the HTTP side of each attempt.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}
