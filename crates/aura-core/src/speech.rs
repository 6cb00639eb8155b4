//! Speech capture and output capabilities.
//!
//! Speech-to-text and text-to-speech live outside this workspace; these
//! traits are the seams the interaction loop talks through.

use async_trait::async_trait;

use crate::error::Result;

/// Captures the next utterance from the user.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Blocks until the user says something.
    ///
    /// Returns an empty string when recognition failed for this utterance
    /// (the caller re-prompts), and `Err(AuraError::Capture)` when the capture
    /// device is gone for good.
    async fn listen(&self) -> Result<String>;
}

/// Speaks text back to the user.
#[async_trait]
pub trait SpeechOutput: Send + Sync {
    async fn speak(&self, text: &str) -> Result<()>;
}
