//! Session log repository trait.
//!
//! Defines the interface for the append-only session log.

use async_trait::async_trait;

use super::model::Turn;
use crate::error::Result;

/// Durable, append-only storage of session turns.
///
/// Sessions are never deleted through this interface.
#[async_trait]
pub trait SessionLogRepository: Send + Sync {
    /// Returns the highest session id ever stored.
    ///
    /// - `Ok(None)`: the store is empty
    async fn max_session_id(&self) -> Result<Option<u64>>;

    /// Creates an empty session, reserving its id.
    ///
    /// An existing session is left untouched.
    async fn create(&self, session_id: u64) -> Result<()>;

    /// Appends `turn` to the session, creating the session if needed.
    ///
    /// Must be durable when it returns `Ok`.
    async fn append(&self, session_id: u64, turn: &Turn) -> Result<()>;

    /// Reads a session's turns in append order.
    ///
    /// A session that was never created is [`AuraError::NotFound`].
    ///
    /// [`AuraError::NotFound`]: crate::error::AuraError::NotFound
    async fn read(&self, session_id: u64) -> Result<Vec<Turn>>;
}
