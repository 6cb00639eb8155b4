//! The top-level listen → route → respond → log loop.

use std::sync::Arc;

use anyhow::{Context, Result};
use aura_core::config::AssistantConfig;
use aura_core::session::SessionManager;
use aura_core::speech::{SpeechInput, SpeechOutput};
use aura_core::text::contains_any_phrase;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::idle_reminder::IdleReminder;
use crate::router::Router;
use crate::speech_prompter::SpeechPrompter;

/// Spoken when recognition produced nothing.
pub const NOT_CAUGHT: &str = "I didn't catch that.";

/// The speech capabilities the loop talks through.
#[derive(Clone)]
pub struct Speech {
    pub input: Arc<dyn SpeechInput>,
    pub output: Arc<dyn SpeechOutput>,
}

enum Flow {
    Continue,
    Exit,
}

/// Handles utterances strictly one at a time for the life of the process.
///
/// Owns the live session and the idle clock. The idle check is polled while
/// waiting for speech, including answers to resolver prompts, so a long
/// silence still triggers the reminder.
pub struct InteractionLoop {
    speech: Speech,
    router: Router,
    sessions: SessionManager,
    idle: IdleReminder,
    assistant: AssistantConfig,
}

impl InteractionLoop {
    pub fn new(
        speech: Speech,
        router: Router,
        sessions: SessionManager,
        idle: IdleReminder,
        assistant: AssistantConfig,
    ) -> Self {
        Self {
            speech,
            router,
            sessions,
            idle,
            assistant,
        }
    }

    /// Runs until an exit phrase (`Ok`) or a capture device failure (`Err`).
    pub async fn run(&self) -> Result<()> {
        info!(session_id = self.sessions.session_id(), "interaction loop started");
        self.say(&self.assistant.greeting).await;

        loop {
            let utterance = match self.idle.listen(self.speech.input.as_ref()).await {
                Ok(utterance) => utterance,
                Err(e) => {
                    error!(error = %e, "speech capture failed");
                    return Err(anyhow::Error::new(e).context("speech capture failed"));
                }
            };

            match self.handle(&utterance).await? {
                Flow::Continue => {}
                Flow::Exit => {
                    info!(session_id = self.sessions.session_id(), "interaction loop finished");
                    return Ok(());
                }
            }
        }
    }

    async fn handle(&self, utterance: &str) -> Result<Flow> {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            self.say(NOT_CAUGHT).await;
            return Ok(Flow::Continue);
        }

        if contains_any_phrase(utterance, &self.assistant.exit_phrases) {
            self.say(&self.assistant.farewell).await;
            return Ok(Flow::Exit);
        }

        self.idle.mark_activity(Instant::now().into_std());

        let prompter = SpeechPrompter::new(
            self.speech.input.as_ref(),
            self.speech.output.as_ref(),
            &self.idle,
            &self.assistant.exit_phrases,
        );
        let dispatch = self
            .router
            .dispatch(utterance, &prompter)
            .await
            .context("speech capture failed during command resolution")?;

        self.idle.mark_activity(Instant::now().into_std());
        self.say(&dispatch.response).await;

        if let Err(e) = self.sessions.record(utterance, &dispatch.response).await {
            warn!(
                session_id = self.sessions.session_id(),
                error = %e,
                "failed to append turn to session log"
            );
        }

        Ok(Flow::Continue)
    }

    async fn say(&self, text: &str) {
        if let Err(e) = self.speech.output.speak(text).await {
            warn!(error = %e, "failed to speak response");
        }
    }
}
