use std::sync::Arc;

use tracing::{info, warn};

use super::model::{ConversationContext, Turn};
use super::repository::SessionLogRepository;
use crate::error::Result;

/// Owns the live session of this process run.
///
/// `SessionManager` is responsible for:
/// - Allocating the session id once at startup (`max + 1`, starting at 1)
///   and reserving it in the store, so a run without turns still uses it up
/// - Seeding conversation context from the most recent session with turns
/// - Durably appending every completed turn
pub struct SessionManager {
    /// Persistent storage backend for session turns
    repository: Arc<dyn SessionLogRepository>,
    session_id: u64,
    /// Maximum number of prior turns loaded into the context
    context_turns: usize,
}

impl SessionManager {
    /// Computes the id for a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session log cannot be scanned.
    pub async fn next_session_id(repository: &dyn SessionLogRepository) -> Result<u64> {
        Ok(repository.max_session_id().await?.map_or(1, |max| max + 1))
    }

    /// Starts a new session and loads the context of the previous one.
    ///
    /// The id is computed and reserved here, once per process start, never
    /// per turn.
    pub async fn start(
        repository: Arc<dyn SessionLogRepository>,
        context_turns: usize,
    ) -> Result<(Self, ConversationContext)> {
        let session_id = Self::next_session_id(repository.as_ref()).await?;
        repository.create(session_id).await?;
        let manager = Self {
            repository,
            session_id,
            context_turns,
        };
        let context = manager.load_context(session_id).await;
        info!(
            session_id,
            context_turns = context.turns.len(),
            "session started"
        );
        Ok((manager, context))
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    /// Loads the last turns of the most recent session before `session_id`
    /// that has any.
    ///
    /// Empty sessions are skipped. Never fails: a missing session ends the
    /// search, and a log that cannot be read yields an empty context.
    pub async fn load_context(&self, session_id: u64) -> ConversationContext {
        for prior in (1..session_id).rev() {
            match self.repository.read(prior).await {
                Ok(turns) if turns.is_empty() => continue,
                Ok(turns) => {
                    return ConversationContext::from_session(prior, turns, self.context_turns);
                }
                Err(e) if e.is_not_found() => break,
                Err(e) => {
                    warn!(session_id = prior, error = %e, "could not load prior session, starting without context");
                    break;
                }
            }
        }
        ConversationContext::default()
    }

    /// Durably appends a turn to `session_id`.
    pub async fn append_turn(&self, session_id: u64, turn: Turn) -> Result<()> {
        self.repository.append(session_id, &turn).await
    }

    /// Appends a turn with the current timestamp to the live session.
    pub async fn record(&self, command: &str, response: &str) -> Result<Turn> {
        let turn = Turn::new(command, response);
        self.append_turn(self.session_id, turn.clone()).await?;
        Ok(turn)
    }
}
