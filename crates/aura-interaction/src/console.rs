//! Console stand-ins for the speech capabilities.
//!
//! Typed lines play the part of recognized utterances and printed lines the
//! part of spoken responses. rustyline blocks, so the editor lives on its own
//! thread and serves one line per `listen` request.

use std::sync::mpsc as std_mpsc;
use std::thread;

use async_trait::async_trait;
use aura_core::error::{AuraError, Result};
use aura_core::idle::{ReminderItem, ReminderNotifier};
use aura_core::speech::{SpeechInput, SpeechOutput};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::{mpsc, Mutex};

const PROMPT: &str = ">> ";

/// What the editor thread read for one request.
enum LineEvent {
    Line(String),
    /// Ctrl-C: treated like a failed recognition
    Interrupted,
    /// Input is gone (Ctrl-D, closed stdin, terminal error)
    Closed(String),
}

/// Reads utterances from the terminal and prints responses.
pub struct ConsoleSpeech {
    requests: std_mpsc::Sender<()>,
    lines: Mutex<mpsc::Receiver<LineEvent>>,
    assistant_name: String,
}

impl ConsoleSpeech {
    /// Starts the editor thread. A terminal that cannot be opened is reported
    /// by the first `listen`.
    pub fn spawn(assistant_name: impl Into<String>) -> Result<Self> {
        let (request_tx, request_rx) = std_mpsc::channel::<()>();
        let (line_tx, line_rx) = mpsc::channel::<LineEvent>(1);

        thread::Builder::new()
            .name("aura-console".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => editor,
                    Err(e) => {
                        let _ = line_tx
                            .blocking_send(LineEvent::Closed(format!("Failed to open terminal: {e}")));
                        return;
                    }
                };

                for () in request_rx {
                    let event = match editor.readline(PROMPT) {
                        Ok(line) => {
                            let trimmed = line.trim();
                            if !trimmed.is_empty() {
                                let _ = editor.add_history_entry(trimmed);
                            }
                            LineEvent::Line(trimmed.to_string())
                        }
                        Err(ReadlineError::Interrupted) => LineEvent::Interrupted,
                        Err(ReadlineError::Eof) => LineEvent::Closed("end of input".to_string()),
                        Err(err) => LineEvent::Closed(err.to_string()),
                    };
                    let closed = matches!(event, LineEvent::Closed(_));
                    if line_tx.blocking_send(event).is_err() || closed {
                        break;
                    }
                }
            })
            .map_err(|e| AuraError::internal(format!("Failed to spawn console thread: {e}")))?;

        Ok(Self {
            requests: request_tx,
            lines: Mutex::new(line_rx),
            assistant_name: assistant_name.into(),
        })
    }
}

#[async_trait]
impl SpeechInput for ConsoleSpeech {
    async fn listen(&self) -> Result<String> {
        let mut lines = self.lines.lock().await;

        self.requests
            .send(())
            .map_err(|_| AuraError::Capture("console input closed".to_string()))?;

        match lines.recv().await {
            Some(LineEvent::Line(line)) => Ok(line),
            Some(LineEvent::Interrupted) => {
                println!("{}", "CTRL-C detected. Say 'exit' to quit.".yellow());
                Ok(String::new())
            }
            Some(LineEvent::Closed(reason)) => Err(AuraError::Capture(reason)),
            None => Err(AuraError::Capture("console input closed".to_string())),
        }
    }
}

#[async_trait]
impl SpeechOutput for ConsoleSpeech {
    async fn speak(&self, text: &str) -> Result<()> {
        println!(
            "{} {}",
            format!("[{}]", self.assistant_name).bright_magenta(),
            text.bright_blue()
        );
        Ok(())
    }
}

/// Prints due reminders as a highlighted block.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    app_name: String,
}

impl ConsoleNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

/// Formats one reminder line, e.g. `Submit report (due 10:45 UTC)`.
pub fn format_reminder(item: &ReminderItem) -> String {
    format!("{} (due {})", item.title, item.due.format("%H:%M UTC"))
}

#[async_trait]
impl ReminderNotifier for ConsoleNotifier {
    async fn notify(&self, items: &[ReminderItem]) -> Result<()> {
        if items.is_empty() {
            println!(
                "{}",
                format!("[{}] Still there? Nothing is due right now.", self.app_name).bright_black()
            );
            return Ok(());
        }

        println!(
            "{}",
            format!("[{}] Task Reminder", self.app_name).bright_yellow().bold()
        );
        for item in items {
            println!("  {}", format!("- {}", format_reminder(item)).yellow());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_format_reminder() {
        let item = ReminderItem {
            title: "Submit report".to_string(),
            due: Utc.with_ymd_and_hms(2024, 5, 1, 10, 45, 0).unwrap(),
        };
        assert_eq!(format_reminder(&item), "Submit report (due 10:45 UTC)");
    }

    #[tokio::test]
    async fn test_notifier_accepts_empty_and_non_empty() {
        let notifier = ConsoleNotifier::new("Aura");
        notifier.notify(&[]).await.unwrap();
        notifier
            .notify(&[ReminderItem {
                title: "Call the bank".to_string(),
                due: Utc::now(),
            }])
            .await
            .unwrap();
    }
}
