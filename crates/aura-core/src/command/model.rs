//! Custom command domain models.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::normalize_name;

/// A user-named, persisted, directly executable shell action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCommand {
    /// Normalized command name (lowercase, trimmed, single-spaced)
    pub name: String,
    /// Shell action executed when the command is invoked
    pub action: String,
    /// When the command was confirmed and saved
    pub created_at: DateTime<Utc>,
}

impl CustomCommand {
    /// Creates a command, normalizing `name`.
    pub fn new(name: &str, action: impl Into<String>) -> Self {
        Self {
            name: normalize_name(name),
            action: action.into(),
            created_at: Utc::now(),
        }
    }
}

/// Where a resolution request came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Normalized command name to look up
    pub name: String,
    /// True when the user explicitly asked for a custom command
    /// ("create a command called backup"), false for an unmatched utterance.
    pub explicit: bool,
}

impl CommandRequest {
    /// A request from an utterance routed to the custom capability.
    pub fn explicit(utterance: &str) -> Self {
        Self {
            name: extract_command_name(utterance),
            explicit: true,
        }
    }

    /// A request from an utterance that matched no capability.
    pub fn implicit(utterance: &str) -> Self {
        Self {
            name: normalize_name(utterance),
            explicit: false,
        }
    }
}

static NAMED_PATTERN: OnceLock<Regex> = OnceLock::new();
static COMMAND_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Extracts the command name from an explicit custom command utterance.
///
/// - `"create a command called backup"` → `"backup"`
/// - `"run command backup"` → `"backup"`
/// - anything else → the whole utterance, normalized
pub fn extract_command_name(utterance: &str) -> String {
    let named = NAMED_PATTERN
        .get_or_init(|| Regex::new(r"(?i)\b(?:called|named)\s+(.+)$").expect("valid regex"));
    let command = COMMAND_PATTERN
        .get_or_init(|| Regex::new(r"(?i)\bcommands?\s+(.+)$").expect("valid regex"));

    let extracted = named
        .captures(utterance)
        .or_else(|| command.captures(utterance))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(utterance);

    let name = normalize_name(extracted);
    if name.is_empty() {
        normalize_name(utterance)
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_name() {
        let command = CustomCommand::new("  BackUp  ", "zip -r project.zip ./project");
        assert_eq!(command.name, "backup");
        assert_eq!(command.action, "zip -r project.zip ./project");
    }

    #[test]
    fn test_extract_called() {
        assert_eq!(extract_command_name("Create a command called Backup."), "backup");
        assert_eq!(extract_command_name("make a new command named clean temp"), "clean temp");
    }

    #[test]
    fn test_extract_after_command_keyword() {
        assert_eq!(extract_command_name("run command backup"), "backup");
        assert_eq!(extract_command_name("commands deploy site"), "deploy site");
    }

    #[test]
    fn test_extract_falls_back_to_utterance() {
        assert_eq!(extract_command_name("command"), "command");
        assert_eq!(extract_command_name("Backup"), "backup");
    }

    #[test]
    fn test_requests() {
        let explicit = CommandRequest::explicit("create a command called backup");
        assert_eq!(explicit.name, "backup");
        assert!(explicit.explicit);

        let implicit = CommandRequest::implicit(" Backup ");
        assert_eq!(implicit.name, "backup");
        assert!(!implicit.explicit);
    }
}
