//! `tasks.toml` layout. Written by the task domain, only read here.

use aura_core::idle::ReminderItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFileDto {
    #[serde(default)]
    pub tasks: Vec<TaskDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDto {
    pub title: String,
    pub deadline: DateTime<Utc>,
}

impl TaskDto {
    pub fn to_reminder(&self) -> ReminderItem {
        ReminderItem {
            title: self.title.clone(),
            due: self.deadline,
        }
    }
}
