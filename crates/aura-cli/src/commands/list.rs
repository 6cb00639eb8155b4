use anyhow::{Context, Result};
use aura_core::command::{CommandRepository, CustomCommand};
use aura_infrastructure::{AuraPaths, TomlCommandRepository};
use colored::Colorize;

pub async fn run(paths: &AuraPaths) -> Result<()> {
    let repository = TomlCommandRepository::new(paths.commands_file());
    let commands = repository
        .list()
        .await
        .context("Failed to read custom commands")?;

    if commands.is_empty() {
        println!("{}", "No custom commands saved yet.".bright_black());
        return Ok(());
    }

    for command in &commands {
        println!("{}", format_command(command));
    }
    Ok(())
}

fn format_command(command: &CustomCommand) -> String {
    format!(
        "{}  {}  {}",
        command.name.bright_cyan().bold(),
        command.action,
        command.created_at.format("(%Y-%m-%d)").to_string().bright_black()
    )
}
