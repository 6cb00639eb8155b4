//! Idle detection and proactive reminders.

mod reminder;
mod watchdog;

pub use reminder::{DueItemSource, ReminderItem, ReminderNotifier};
pub use watchdog::{IdleWatchdog, SharedIdleWatchdog};
