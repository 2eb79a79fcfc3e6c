//! Deterministic exponential backoff.
//!
//! The first wait is `min(initial_delay, max_delay)`. Each following wait is
//! `min(previous * multiplier, max_delay)`. There is no jitter: a config
//! always produces the same sequence.
//!
//! ```rust
//! use std::time::Duration;
//! use hadash_status::{BackoffConfig, BackoffPolicy};
//!
//! let policy = BackoffPolicy::new(&BackoffConfig::default());
//! let delays: Vec<_> = policy.delays().take(6).collect();
//! assert_eq!(delays[0], Duration::from_millis(1_000));
//! assert_eq!(delays[3], Duration::from_millis(8_000));
//! assert_eq!(delays[5], Duration::from_millis(30_000)); // capped
//! ```

use std::time::Duration;

use crate::BackoffConfig;

/// Delay computation rule derived from a [`BackoffConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct BackoffPolicy {
    initial: Duration,
    max: Duration,
    multiplier: f64,
}

impl BackoffPolicy {
    pub fn new(config: &BackoffConfig) -> Self {
        let max = config.max_delay();
        Self {
            initial: config.initial_delay().min(max),
            max,
            multiplier: config.backoff_multiplier,
        }
    }

    /// Wait inserted before the first retry.
    pub fn first_delay(&self) -> Duration {
        self.initial
    }

    /// Advances `current` by one step, saturating at the ceiling.
    pub fn next_delay(&self, current: Duration) -> Duration {
        let scaled = current.as_secs_f64() * self.multiplier;
        Duration::try_from_secs_f64(scaled).map_or(self.max, |delay| delay.min(self.max))
    }

    /// Infinite iterator over the waits of a retry sequence.
    pub fn delays(&self) -> Delays {
        Delays {
            policy: self.clone(),
            next: self.first_delay(),
        }
    }
}

/// Iterator returned by [`BackoffPolicy::delays`].
#[derive(Clone, Debug)]
pub struct Delays {
    policy: BackoffPolicy,
    next: Duration,
}

impl Iterator for Delays {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = self.policy.next_delay(current);
        Some(current)
    }
}
