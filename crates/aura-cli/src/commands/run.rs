use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use aura_application::{IdleReminder, InteractionLoop, Router, Speech};
use aura_core::capability::default_registry;
use aura_core::command::CommandResolver;
use aura_core::session::SessionManager;
use aura_infrastructure::{
    AuraPaths, ConfigService, SystemShellExecutor, TomlCommandRepository,
    TomlSessionLogRepository, TomlTaskSource,
};
use aura_interaction::{ConsoleNotifier, ConsoleSpeech, GeminiSuggestionService};

const ASSISTANT_NAME: &str = "Aura";

/// Wires the adapters together and runs the interaction loop.
pub async fn run(paths: &AuraPaths) -> Result<()> {
    let config_service = ConfigService::new(paths);
    let config = config_service
        .load_config()
        .context("Failed to load config.toml")?;

    let credentials = match config_service.gemini_credentials() {
        Ok(Some(credentials)) => Some(credentials),
        Ok(None) => {
            tracing::warn!("No Gemini API key configured; command suggestions are unavailable");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read secret.json; command suggestions are unavailable");
            None
        }
    };

    let session_log = Arc::new(TomlSessionLogRepository::new(paths.sessions_dir()));
    let (sessions, context) = SessionManager::start(session_log, config.session.context_turns)
        .await
        .context("Failed to start session")?;

    let suggester = GeminiSuggestionService::new(credentials, &config.gemini).with_context(&context);
    let resolver = CommandResolver::new(
        Arc::new(TomlCommandRepository::new(paths.commands_file())),
        Arc::new(suggester),
        Arc::new(SystemShellExecutor::new()),
        config.resolver.clone(),
    );
    let router = Router::new(default_registry().clone(), resolver);

    let idle = IdleReminder::new(
        Instant::now(),
        config.idle.threshold(),
        config.idle.poll_interval(),
        Arc::new(TomlTaskSource::new(
            paths.tasks_file(),
            config.idle.lookahead_mins,
        )),
        Arc::new(ConsoleNotifier::new(ASSISTANT_NAME)),
    );

    let console = Arc::new(ConsoleSpeech::spawn(ASSISTANT_NAME)?);
    let speech = Speech {
        input: console.clone(),
        output: console,
    };

    InteractionLoop::new(speech, router, sessions, idle, config.assistant)
        .run()
        .await
}
