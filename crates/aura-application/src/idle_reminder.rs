//! Idle check: after a quiet period, remind the user of due items.

use std::sync::Arc;
use std::time::{Duration, Instant};

use aura_core::error::Result;
use aura_core::idle::{DueItemSource, IdleWatchdog, ReminderNotifier, SharedIdleWatchdog};
use aura_core::speech::SpeechInput;
use chrono::{DateTime, Utc};
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

pub struct IdleReminder {
    watchdog: SharedIdleWatchdog,
    source: Arc<dyn DueItemSource>,
    notifier: Arc<dyn ReminderNotifier>,
    poll_interval: Duration,
}

impl IdleReminder {
    /// Starts the idle clock at `now`.
    pub fn new(
        now: Instant,
        threshold: Duration,
        poll_interval: Duration,
        source: Arc<dyn DueItemSource>,
        notifier: Arc<dyn ReminderNotifier>,
    ) -> Self {
        Self {
            watchdog: SharedIdleWatchdog::new(IdleWatchdog::new(now, threshold)),
            source,
            notifier,
            poll_interval,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn watchdog(&self) -> &SharedIdleWatchdog {
        &self.watchdog
    }

    pub fn mark_activity(&self, now: Instant) {
        self.watchdog.mark_activity(now);
    }

    /// Runs the reminder side effect if the idle threshold has passed.
    ///
    /// Returns whether it fired. Source and notifier failures are logged; the
    /// fire still counts, so a broken source cannot cause a re-fire storm.
    pub async fn check(&self, now: Instant, wall_clock: DateTime<Utc>) -> bool {
        if !self.watchdog.try_fire(now) {
            return false;
        }

        let items = match self.source.due_items(wall_clock).await {
            Ok(items) => items,
            Err(e) => {
                warn!(error = %e, "failed to collect due items");
                Vec::new()
            }
        };
        info!(due = items.len(), "idle threshold reached, sending reminder");

        if let Err(e) = self.notifier.notify(&items).await {
            warn!(error = %e, "failed to deliver reminder");
        }
        true
    }

    /// Waits for the next utterance from `input`, running the idle check on
    /// every poll tick meanwhile.
    ///
    /// Every wait for speech goes through here, whether for a new utterance
    /// or an answer to a prompt. The pending listen is kept across ticks.
    pub async fn listen(&self, input: &dyn SpeechInput) -> Result<String> {
        let listen = input.listen();
        tokio::pin!(listen);

        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.poll_interval,
            self.poll_interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                result = &mut listen => return result,
                _ = ticker.tick() => {
                    self.check(tokio::time::Instant::now().into_std(), Utc::now()).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aura_core::error::AuraError;
    use aura_core::idle::ReminderItem;
    use std::sync::Mutex;

    const THRESHOLD: Duration = Duration::from_secs(1800);

    struct FixedSource {
        items: Result<Vec<ReminderItem>>,
    }

    #[async_trait]
    impl DueItemSource for FixedSource {
        async fn due_items(&self, _now: DateTime<Utc>) -> Result<Vec<ReminderItem>> {
            self.items.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<Vec<ReminderItem>>>,
    }

    #[async_trait]
    impl ReminderNotifier for RecordingNotifier {
        async fn notify(&self, items: &[ReminderItem]) -> Result<()> {
            self.calls.lock().unwrap().push(items.to_vec());
            Ok(())
        }
    }

    fn reminder(
        t0: Instant,
        items: Result<Vec<ReminderItem>>,
    ) -> (IdleReminder, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let reminder = IdleReminder::new(
            t0,
            THRESHOLD,
            Duration::from_secs(5),
            Arc::new(FixedSource { items }),
            notifier.clone(),
        );
        (reminder, notifier)
    }

    #[tokio::test]
    async fn test_fires_once_per_idle_interval() {
        let t0 = Instant::now();
        let item = ReminderItem {
            title: "Submit report".to_string(),
            due: Utc::now(),
        };
        let (reminder, notifier) = reminder(t0, Ok(vec![item.clone()]));

        assert!(!reminder.check(t0 + Duration::from_secs(1799), Utc::now()).await);
        assert!(reminder.check(t0 + Duration::from_secs(1800), Utc::now()).await);
        assert!(!reminder.check(t0 + Duration::from_secs(1801), Utc::now()).await);
        assert!(reminder.check(t0 + Duration::from_secs(3600), Utc::now()).await);

        assert_eq!(*notifier.calls.lock().unwrap(), vec![vec![item.clone()], vec![item]]);
    }

    #[tokio::test]
    async fn test_activity_postpones_fire() {
        let t0 = Instant::now();
        let (reminder, notifier) = reminder(t0, Ok(Vec::new()));

        reminder.mark_activity(t0 + Duration::from_secs(1000));

        assert!(!reminder.check(t0 + Duration::from_secs(1800), Utc::now()).await);
        assert!(reminder.check(t0 + Duration::from_secs(2800), Utc::now()).await);
        assert_eq!(notifier.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_source_failure_still_counts_as_fire() {
        let t0 = Instant::now();
        let (reminder, notifier) =
            reminder(t0, Err(AuraError::data_access("tasks.toml unreadable")));

        assert!(reminder.check(t0 + THRESHOLD, Utc::now()).await);
        assert!(!reminder.check(t0 + THRESHOLD + Duration::from_secs(5), Utc::now()).await);
        assert_eq!(*notifier.calls.lock().unwrap(), vec![Vec::<ReminderItem>::new()]);
    }

    struct SlowInput {
        delay: Duration,
    }

    #[async_trait]
    impl SpeechInput for SlowInput {
        async fn listen(&self) -> Result<String> {
            tokio::time::sleep(self.delay).await;
            Ok("yes".to_string())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_checks_idle_while_waiting() {
        let t0 = tokio::time::Instant::now().into_std();
        let (reminder, notifier) = reminder(t0, Ok(Vec::new()));
        let input = SlowInput {
            delay: Duration::from_secs(3 * 1800 + 30),
        };

        let heard = reminder.listen(&input).await.unwrap();

        assert_eq!(heard, "yes");
        assert_eq!(notifier.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_returns_quickly_without_firing() {
        let t0 = tokio::time::Instant::now().into_std();
        let (reminder, notifier) = reminder(t0, Ok(Vec::new()));
        let input = SlowInput {
            delay: Duration::from_secs(12),
        };

        reminder.listen(&input).await.unwrap();

        assert!(notifier.calls.lock().unwrap().is_empty());
    }
}
