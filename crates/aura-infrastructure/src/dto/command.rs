//! `custom_commands.toml` layout.

use std::collections::BTreeMap;

use aura_core::command::CustomCommand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The whole command store, keyed by normalized name.
///
/// ```toml
/// [commands."backup"]
/// action = "zip -r project.zip ./project"
/// created_at = "2024-05-01T10:00:00Z"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandFileDto {
    #[serde(default)]
    pub commands: BTreeMap<String, CommandEntryDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEntryDto {
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl CommandEntryDto {
    pub fn into_domain(self, name: String) -> CustomCommand {
        CustomCommand {
            name,
            action: self.action,
            created_at: self.created_at,
        }
    }
}

impl From<&CustomCommand> for CommandEntryDto {
    fn from(command: &CustomCommand) -> Self {
        Self {
            action: command.action.clone(),
            created_at: command.created_at,
        }
    }
}
