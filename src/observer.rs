use std::time::Duration;

/// Receives a notification before every backoff wait.
///
/// `attempt` is the 1-based number of the retry about to run; `delay` is
/// the wait that precedes it. Closures `Fn(u32, Duration)` implement this
/// trait directly.
pub trait RetryObserver {
    fn on_retry(&self, attempt: u32, delay: Duration);
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RetryObserver for NoopObserver {
    fn on_retry(&self, _attempt: u32, _delay: Duration) {}
}

impl<F> RetryObserver for F
where
    F: Fn(u32, Duration),
{
    fn on_retry(&self, attempt: u32, delay: Duration) {
        self(attempt, delay)
    }
}
