//! Custom command repository trait.

use async_trait::async_trait;

use crate::command::CustomCommand;
use crate::error::Result;

/// Persistent store mapping normalized command names to actions.
///
/// At most one action is kept per name; saving an existing name overwrites
/// it (last write wins).
#[async_trait]
pub trait CommandRepository: Send + Sync {
    /// Gets a command by its normalized name.
    async fn get(&self, name: &str) -> Result<Option<CustomCommand>>;

    /// Adds or replaces a command.
    async fn save(&self, command: CustomCommand) -> Result<()>;

    /// Lists all commands, sorted by name.
    async fn list(&self) -> Result<Vec<CustomCommand>>;
}
