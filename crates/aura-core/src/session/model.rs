//! Session domain model.
//!
//! A session is one process run's append-only log of command/response
//! turns, identified by a monotonically increasing integer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub timestamp: DateTime<Utc>,
    /// Literal command text as captured
    pub command: String,
    /// Literal response text as spoken
    pub response: String,
}

impl Turn {
    pub fn new(command: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            command: command.into(),
            response: response.into(),
        }
    }
}

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant.
    Assistant,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
}

/// Bounded history from the previous session used to seed the generative
/// chat state. Empty is a valid context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationContext {
    /// The session the turns were taken from
    pub source_session: Option<u64>,
    pub turns: Vec<Turn>,
}

impl ConversationContext {
    /// Keeps the last `window` turns of `session`.
    pub fn from_session(session_id: u64, turns: Vec<Turn>, window: usize) -> Self {
        let skip = turns.len().saturating_sub(window);
        Self {
            source_session: Some(session_id),
            turns: turns.into_iter().skip(skip).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Flattens the turns into alternating user/assistant messages.
    pub fn messages(&self) -> Vec<ConversationMessage> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    ConversationMessage {
                        role: MessageRole::User,
                        content: turn.command.clone(),
                    },
                    ConversationMessage {
                        role: MessageRole::Assistant,
                        content: turn.response.clone(),
                    },
                ]
            })
            .collect()
    }
}
