//! `sessions/session-<id>.toml` layout.

use aura_core::session::Turn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFileDto {
    pub session_id: u64,
    #[serde(default)]
    pub turns: Vec<TurnDto>,
}

impl SessionFileDto {
    pub fn new(session_id: u64) -> Self {
        Self {
            session_id,
            turns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnDto {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub response: String,
}

impl TurnDto {
    pub fn into_domain(self) -> Turn {
        Turn {
            timestamp: self.timestamp,
            command: self.command,
            response: self.response,
        }
    }
}

impl From<&Turn> for TurnDto {
    fn from(turn: &Turn) -> Self {
        Self {
            timestamp: turn.timestamp,
            command: turn.command.clone(),
            response: turn.response.clone(),
        }
    }
}
