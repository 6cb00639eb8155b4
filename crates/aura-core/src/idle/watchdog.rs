//! Idle watchdog.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Tracks time since the last processed utterance.
///
/// Fires once per idle interval: firing resets `last_activity`, so it cannot
/// fire again until another full threshold passes without activity.
#[derive(Debug, Clone)]
pub struct IdleWatchdog {
    last_activity: Instant,
    threshold: Duration,
}

impl IdleWatchdog {
    pub fn new(now: Instant, threshold: Duration) -> Self {
        Self {
            last_activity: now,
            threshold,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// True once `now - last_activity >= threshold`.
    pub fn should_fire(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) >= self.threshold
    }

    /// Records a routed utterance.
    pub fn mark_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Records that the reminder side effect ran.
    pub fn mark_fired(&mut self, now: Instant) {
        self.last_activity = now;
    }
}

/// An [`IdleWatchdog`] behind a single mutex, shared between the loop that
/// marks activity and the poller that checks for idleness.
#[derive(Debug, Clone)]
pub struct SharedIdleWatchdog {
    inner: Arc<Mutex<IdleWatchdog>>,
}

impl SharedIdleWatchdog {
    pub fn new(watchdog: IdleWatchdog) -> Self {
        Self {
            inner: Arc::new(Mutex::new(watchdog)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, IdleWatchdog> {
        // A poisoned lock still holds a valid timestamp.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mark_activity(&self, now: Instant) {
        self.lock().mark_activity(now);
    }

    /// Checks and claims a fire in one critical section.
    ///
    /// Returns true at most once per idle interval: when it returns true the
    /// watchdog has already been marked as fired at `now`.
    pub fn try_fire(&self, now: Instant) -> bool {
        let mut watchdog = self.lock();
        if watchdog.should_fire(now) {
            watchdog.mark_fired(now);
            true
        } else {
            false
        }
    }

    pub fn snapshot(&self) -> IdleWatchdog {
        self.lock().clone()
    }
}
