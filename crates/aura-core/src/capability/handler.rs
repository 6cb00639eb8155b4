//! Domain handler trait.

use async_trait::async_trait;

use super::key::CapabilityKey;
use crate::error::Result;

/// A domain-specific handler that can fully answer a routed utterance.
///
/// Handlers are one-shot request/response wrappers around external services.
/// Errors are caught at the dispatch boundary and spoken back to the user.
#[async_trait]
pub trait DomainHandler: Send + Sync {
    /// The capability this handler serves.
    fn capability(&self) -> CapabilityKey;

    /// Handles an utterance and returns the response text to speak.
    async fn handle(&self, utterance: &str) -> Result<String>;
}
