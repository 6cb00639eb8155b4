//! Lookup-or-synthesize resolution of custom commands.
//!
//! ```text
//! LOOKUP ──found──▶ EXECUTE
//!    │
//!    └─missing──▶ PROMPT_CREATE ──no──▶ CANCELLED
//!                      │yes
//!                      ▼
//!                  DESCRIBE ──▶ SYNTHESIZE ──▶ SUGGEST ──no──▶ CANCELLED
//!                                                 │yes
//!                                                 ▼
//!                                              PERSIST ──▶ DONE
//! ```
//!
//! The command store is written only in `PERSIST`. Every other exit leaves it
//! untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use tracing::{debug, info, warn};

use super::model::{CommandRequest, CustomCommand};
use super::repository::CommandRepository;
use crate::config::ResolverConfig;
use crate::error::Result;
use crate::shell::{ExecutionReport, ShellExecutor};
use crate::suggestion::{sanitize_action, CommandSuggester, SuggestionError};
use crate::text::tokenize;

/// What happens to an unmatched utterance whose name is not in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedPolicy {
    /// Offer to create a command for every unmatched utterance.
    #[default]
    OfferCreate,
    /// Only explicit custom command requests may create commands. Unmatched
    /// utterances can still run existing commands.
    ExplicitOnly,
}

/// A reply to a resolver question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    /// What the user said. Empty means recognition failed.
    Answer(String),
    /// The user said an exit phrase.
    Exit,
}

/// Asks the user a question and waits for the reply.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// `Err` is reserved for unrecoverable capture failures.
    async fn ask(&self, question: &str) -> Result<PromptReply>;
}

/// Non-terminal states of the resolution state machine.
#[derive(Debug, Clone, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ResolutionState {
    Lookup,
    Execute(CustomCommand),
    PromptCreate,
    Describe,
    Synthesize(String),
    Suggest(String),
    Persist(String),
}

impl ResolutionState {
    pub fn label(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// "No" at PROMPT_CREATE
    Declined,
    /// "No" at SUGGEST
    SuggestionRejected,
    /// Exit phrase during a prompt
    Abandoned,
    /// Nothing recognizable after all re-prompts
    NoAnswer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    EmptyName,
    Lookup(String),
    Suggestion(SuggestionError),
    Save(String),
    Execution(String),
}

/// Terminal result of one resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A stored command was run.
    Executed {
        name: String,
        action: String,
        report: ExecutionReport,
    },
    /// A new command was confirmed and persisted (not executed).
    Created { name: String, action: String },
    Cancelled { name: String, reason: CancelReason },
    /// Unmatched utterance, nothing stored, creation not offered.
    NotFound { name: String },
    Failed { name: String, reason: FailureReason },
}

impl Resolution {
    /// The text spoken back to the user.
    pub fn response(&self) -> String {
        match self {
            Self::Executed { name, report, .. } if report.success => {
                format!("Executed command '{name}'.")
            }
            Self::Executed { name, report, .. } => match report.exit_code {
                Some(code) => format!("Command '{name}' failed with exit code {code}."),
                None => format!("Command '{name}' was terminated before it finished."),
            },
            Self::Created { name, .. } => {
                format!("Custom command '{name}' added successfully and ready for use.")
            }
            Self::Cancelled { name, reason } => match reason {
                CancelReason::Declined => "Command creation canceled.".to_string(),
                CancelReason::SuggestionRejected => {
                    format!("Okay, I won't save '{name}'.")
                }
                CancelReason::Abandoned => format!("Okay, I stopped creating '{name}'."),
                CancelReason::NoAnswer => {
                    format!("I didn't get an answer, so I canceled creating '{name}'.")
                }
            },
            Self::NotFound { .. } => "Module not found. Please try again.".to_string(),
            Self::Failed { name, reason } => match reason {
                FailureReason::EmptyName => "I didn't catch the command name.".to_string(),
                FailureReason::Lookup(_) => {
                    format!("Sorry, I couldn't look up the command '{name}'.")
                }
                FailureReason::Suggestion(err) => {
                    format!("Sorry, I couldn't generate a command for '{name}': {err}.")
                }
                FailureReason::Save(_) => {
                    format!("Sorry, I could not save the command '{name}'.")
                }
                FailureReason::Execution(_) => {
                    format!("Sorry, I couldn't run the command '{name}'.")
                }
            },
        }
    }

    /// True only for the path that wrote to the command store.
    pub fn persisted(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

const AFFIRMATIVES: &[&str] = &[
    "yes",
    "y",
    "yeah",
    "yep",
    "yup",
    "sure",
    "ok",
    "okay",
    "confirm",
    "absolutely",
    "please do",
];

/// Whether an answer is an explicit "yes".
pub fn is_affirmative(answer: &str) -> bool {
    let tokens = tokenize(answer);
    let joined = tokens.join(" ");
    AFFIRMATIVES.contains(&joined.as_str()) || tokens.first().is_some_and(|t| t == "yes")
}

/// Reply after re-prompting on recognition failures.
enum Reply {
    Text(String),
    Silent,
    Exit,
}

/// Drives the lookup-or-synthesize state machine.
pub struct CommandResolver {
    commands: Arc<dyn CommandRepository>,
    suggester: Arc<dyn CommandSuggester>,
    executor: Arc<dyn ShellExecutor>,
    config: ResolverConfig,
}

impl CommandResolver {
    pub fn new(
        commands: Arc<dyn CommandRepository>,
        suggester: Arc<dyn CommandSuggester>,
        executor: Arc<dyn ShellExecutor>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            commands,
            suggester,
            executor,
            config,
        }
    }

    /// Resolves one request to a terminal [`Resolution`].
    ///
    /// Only capture failures from `prompter` are returned as `Err`; every
    /// other failure is reported through [`Resolution::Failed`].
    pub async fn resolve(
        &self,
        request: &CommandRequest,
        prompter: &dyn Prompter,
    ) -> Result<Resolution> {
        let name = request.name.clone();
        if name.is_empty() {
            return Ok(Resolution::Failed {
                name,
                reason: FailureReason::EmptyName,
            });
        }

        let mut state = ResolutionState::Lookup;
        loop {
            debug!(command = %name, state = state.label(), "resolver state");
            state = match state {
                ResolutionState::Lookup => match self.commands.get(&name).await {
                    Ok(Some(command)) => ResolutionState::Execute(command),
                    Ok(None)
                        if !request.explicit
                            && self.config.unmatched_policy == UnmatchedPolicy::ExplicitOnly =>
                    {
                        return Ok(Resolution::NotFound { name });
                    }
                    Ok(None) => ResolutionState::PromptCreate,
                    Err(e) => {
                        warn!(command = %name, error = %e, "command lookup failed");
                        return Ok(Resolution::Failed {
                            name,
                            reason: FailureReason::Lookup(e.to_string()),
                        });
                    }
                },

                ResolutionState::Execute(command) => {
                    return Ok(self.execute(command).await);
                }

                ResolutionState::PromptCreate => {
                    let question = format!(
                        "The command '{name}' does not exist. Would you like to create it?"
                    );
                    match self.ask(prompter, &question).await? {
                        Reply::Text(answer) if is_affirmative(&answer) => ResolutionState::Describe,
                        Reply::Text(_) => return Ok(cancelled(name, CancelReason::Declined)),
                        Reply::Silent => return Ok(cancelled(name, CancelReason::NoAnswer)),
                        Reply::Exit => return Ok(cancelled(name, CancelReason::Abandoned)),
                    }
                }

                ResolutionState::Describe => {
                    let question = format!("Please describe what '{name}' should do.");
                    match self.ask(prompter, &question).await? {
                        Reply::Text(description) => ResolutionState::Synthesize(description),
                        Reply::Silent => return Ok(cancelled(name, CancelReason::NoAnswer)),
                        Reply::Exit => return Ok(cancelled(name, CancelReason::Abandoned)),
                    }
                }

                ResolutionState::Synthesize(description) => {
                    match self.suggester.suggest(&description).await {
                        Ok(raw) => match sanitize_action(&raw) {
                            Some(candidate) => ResolutionState::Suggest(candidate),
                            None => {
                                return Ok(Resolution::Failed {
                                    name,
                                    reason: FailureReason::Suggestion(SuggestionError::Parse(
                                        "empty suggestion".to_string(),
                                    )),
                                });
                            }
                        },
                        Err(e) => {
                            warn!(command = %name, error = %e, "command suggestion failed");
                            return Ok(Resolution::Failed {
                                name,
                                reason: FailureReason::Suggestion(e),
                            });
                        }
                    }
                }

                ResolutionState::Suggest(candidate) => {
                    let question = format!(
                        "Suggested command: {candidate}. Would you like to save this command?"
                    );
                    match self.ask(prompter, &question).await? {
                        Reply::Text(answer) if is_affirmative(&answer) => {
                            ResolutionState::Persist(candidate)
                        }
                        Reply::Text(_) => {
                            return Ok(cancelled(name, CancelReason::SuggestionRejected));
                        }
                        Reply::Silent => return Ok(cancelled(name, CancelReason::NoAnswer)),
                        Reply::Exit => return Ok(cancelled(name, CancelReason::Abandoned)),
                    }
                }

                ResolutionState::Persist(action) => {
                    let command = CustomCommand::new(&name, action.clone());
                    return Ok(match self.commands.save(command).await {
                        Ok(()) => {
                            info!(command = %name, action = %action, "custom command saved");
                            Resolution::Created { name, action }
                        }
                        Err(e) => {
                            warn!(command = %name, error = %e, "failed to save custom command");
                            Resolution::Failed {
                                name,
                                reason: FailureReason::Save(e.to_string()),
                            }
                        }
                    });
                }
            };
        }
    }

    async fn execute(&self, command: CustomCommand) -> Resolution {
        let CustomCommand { name, action, .. } = command;
        match self.executor.execute(&action).await {
            Ok(report) => {
                info!(command = %name, success = report.success, exit_code = ?report.exit_code, "custom command executed");
                Resolution::Executed {
                    name,
                    action,
                    report,
                }
            }
            Err(e) => {
                warn!(command = %name, error = %e, "custom command could not be started");
                Resolution::Failed {
                    name,
                    reason: FailureReason::Execution(e.to_string()),
                }
            }
        }
    }

    /// Asks `question`, re-asking on empty answers up to the configured limit.
    async fn ask(&self, prompter: &dyn Prompter, question: &str) -> Result<Reply> {
        for _ in 0..=self.config.prompt_retries {
            match prompter.ask(question).await? {
                PromptReply::Exit => return Ok(Reply::Exit),
                PromptReply::Answer(answer) if !answer.trim().is_empty() => {
                    return Ok(Reply::Text(answer.trim().to_string()));
                }
                PromptReply::Answer(_) => continue,
            }
        }
        Ok(Reply::Silent)
    }
}

fn cancelled(name: String, reason: CancelReason) -> Resolution {
    debug!(command = %name, ?reason, "resolution cancelled");
    Resolution::Cancelled { name, reason }
}
