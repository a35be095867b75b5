use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Source of time for cache expiry and retry backoff.
#[async_trait]
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Suspend the caller for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The real wall clock, sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::time::sleep(duration).await;
    }
}

/// A clock that only moves when told to.
///
/// `sleep` returns immediately after advancing the clock by the requested
/// duration and recording it, so expiry and backoff can be asserted without
/// waiting on real time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    inner: Arc<Mutex<ManualClockState>>,
}

#[derive(Debug)]
struct ManualClockState {
    now: Timestamp,
    sleeps: Vec<Duration>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ManualClockState {
                now,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Moves the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: SignedDuration) {
        let mut state = self.inner.lock();
        state.now = state.now.checked_add(by).unwrap_or(state.now);
    }

    pub fn set(&self, now: Timestamp) {
        self.inner.lock().now = now;
    }

    /// Every duration passed to [`Clock::sleep`] so far, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.inner.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut state = self.inner.lock();
        state.sleeps.push(duration);
        if let Ok(step) = SignedDuration::try_from(duration) {
            state.now = state.now.checked_add(step).unwrap_or(state.now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn manual_clock_advances_on_sleep() {
        let base = Timestamp::from_second(0).unwrap();
        let clock = ManualClock::new(base);
        assert_eq!(clock.now(), base);

        clock.sleep(Duration::from_millis(1200)).await;
        assert_eq!(
            clock.now(),
            base.checked_add(SignedDuration::from_millis(1200)).unwrap()
        );
        assert_eq!(clock.sleeps(), vec![Duration::from_millis(1200)]);
    }

    #[test]
    fn manual_clock_advance_and_set() {
        let clock = ManualClock::new(Timestamp::from_second(100).unwrap());
        clock.advance(SignedDuration::from_secs(50));
        assert_eq!(clock.now(), Timestamp::from_second(150).unwrap());

        clock.set(Timestamp::from_second(10).unwrap());
        assert_eq!(clock.now(), Timestamp::from_second(10).unwrap());
        assert!(clock.sleeps().is_empty());
    }
}
