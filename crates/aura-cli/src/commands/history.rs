use anyhow::{Context, Result};
use aura_core::session::{SessionLogRepository, Turn};
use aura_infrastructure::{AuraPaths, TomlSessionLogRepository};
use colored::Colorize;

pub async fn run(paths: &AuraPaths, session: Option<u64>) -> Result<()> {
    let repository = TomlSessionLogRepository::new(paths.sessions_dir());

    let session_id = match session {
        Some(id) => id,
        None => match repository
            .max_session_id()
            .await
            .context("Failed to scan session log")?
        {
            Some(id) => id,
            None => {
                println!("{}", "No sessions recorded yet.".bright_black());
                return Ok(());
            }
        },
    };

    let turns = match repository.read(session_id).await {
        Ok(turns) => turns,
        Err(e) if e.is_not_found() => anyhow::bail!("Session {session_id} does not exist"),
        Err(e) => return Err(e).with_context(|| format!("Failed to read session {session_id}")),
    };

    println!("{}", format!("Session {session_id}").bright_magenta().bold());
    if turns.is_empty() {
        println!("{}", "(no turns)".bright_black());
    }
    for turn in &turns {
        for line in format_turn(turn) {
            println!("{line}");
        }
    }
    Ok(())
}

fn format_turn(turn: &Turn) -> [String; 2] {
    [
        format!(
            "{} {}",
            turn.timestamp.format("[%Y-%m-%d %H:%M:%S]").to_string().bright_black(),
            format!("> {}", turn.command).green()
        ),
        format!("  {}", turn.response.bright_blue()),
    ]
}
