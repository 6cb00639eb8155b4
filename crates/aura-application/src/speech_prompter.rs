//! Resolver prompts over the speech capabilities.

use async_trait::async_trait;
use aura_core::command::{PromptReply, Prompter};
use aura_core::error::Result;
use aura_core::speech::{SpeechInput, SpeechOutput};
use aura_core::text::contains_any_phrase;
use tokio::time::Instant;

use crate::idle_reminder::IdleReminder;

/// Speaks each question and listens for the answer.
///
/// Waiting for an answer runs the idle check like any other listen, and an
/// answer counts as activity. An answer containing an exit phrase is reported
/// as [`PromptReply::Exit`].
pub struct SpeechPrompter<'a> {
    input: &'a dyn SpeechInput,
    output: &'a dyn SpeechOutput,
    idle: &'a IdleReminder,
    exit_phrases: &'a [String],
}

impl<'a> SpeechPrompter<'a> {
    pub fn new(
        input: &'a dyn SpeechInput,
        output: &'a dyn SpeechOutput,
        idle: &'a IdleReminder,
        exit_phrases: &'a [String],
    ) -> Self {
        Self {
            input,
            output,
            idle,
            exit_phrases,
        }
    }
}

#[async_trait]
impl Prompter for SpeechPrompter<'_> {
    async fn ask(&self, question: &str) -> Result<PromptReply> {
        if let Err(e) = self.output.speak(question).await {
            tracing::warn!(error = %e, "failed to speak prompt");
        }

        let answer = self.idle.listen(self.input).await?;
        self.idle.mark_activity(Instant::now().into_std());
        if contains_any_phrase(&answer, self.exit_phrases) {
            return Ok(PromptReply::Exit);
        }
        Ok(PromptReply::Answer(answer))
    }
}
