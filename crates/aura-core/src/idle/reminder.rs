//! Reminder side effect of the idle watchdog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Something the user should be reminded of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderItem {
    pub title: String,
    pub due: DateTime<Utc>,
}

/// Produces items that are due at `now`.
///
/// Sourcing due items belongs to the task domain; the watchdog only asks.
#[async_trait]
pub trait DueItemSource: Send + Sync {
    async fn due_items(&self, now: DateTime<Utc>) -> Result<Vec<ReminderItem>>;
}

/// Delivers reminders to the user.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn notify(&self, items: &[ReminderItem]) -> Result<()>;
}
