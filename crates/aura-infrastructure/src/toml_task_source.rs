//! Due-item source backed by `tasks.toml`.
//!
//! The task domain owns the file; this adapter only reads it and picks the
//! tasks that are overdue or due within the lookahead window.

use std::path::PathBuf;

use async_trait::async_trait;
use aura_core::error::Result;
use aura_core::idle::{DueItemSource, ReminderItem};
use chrono::{DateTime, Duration, Utc};

use crate::dto::TaskFileDto;
use crate::storage::AtomicTomlFile;

pub struct TomlTaskSource {
    file: AtomicTomlFile<TaskFileDto>,
    lookahead: Duration,
}

impl TomlTaskSource {
    pub fn new(path: PathBuf, lookahead_mins: i64) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            lookahead: Duration::minutes(lookahead_mins),
        }
    }
}

#[async_trait]
impl DueItemSource for TomlTaskSource {
    /// Tasks due by `now + lookahead`, overdue ones included, earliest first.
    async fn due_items(&self, now: DateTime<Utc>) -> Result<Vec<ReminderItem>> {
        let Some(document) = self.file.load()? else {
            return Ok(Vec::new());
        };

        let horizon = now + self.lookahead;
        let mut due: Vec<ReminderItem> = document
            .tasks
            .iter()
            .filter(|task| task.deadline <= horizon)
            .map(|task| task.to_reminder())
            .collect();
        due.sort_by_key(|item| item.due);

        tracing::debug!(count = due.len(), "collected due tasks");
        Ok(due)
    }
}
