use std::path::PathBuf;

use anyhow::{Context, Result};
use aura_infrastructure::AuraPaths;
use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "aura", version)]
#[command(about = "AURA - voice assistant with self-extending custom commands", long_about = None)]
struct Cli {
    /// Directory holding config.toml, secret.json and logs
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Directory holding custom commands, sessions and tasks
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the assistant (default)
    Run,
    /// List saved custom commands
    #[command(name = "commands")]
    ListCommands,
    /// Print the turns of a session
    History {
        /// Session id (defaults to the latest session)
        #[arg(long)]
        session: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = AuraPaths::resolve(cli.config_dir.as_deref(), cli.data_dir.as_deref())
        .context("Failed to resolve configuration directories")?;
    let _log_guard = logging::init(&paths.logs_dir(), cli.verbose)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&paths).await,
        Commands::ListCommands => commands::list::run(&paths).await,
        Commands::History { session } => commands::history::run(&paths, session).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["aura"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "aura",
            "history",
            "--session",
            "3",
            "--data-dir",
            "/tmp/aura",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.command, Some(Commands::History { session: Some(3) }));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/aura")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_commands_subcommand_name() {
        let cli = Cli::try_parse_from(["aura", "commands"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ListCommands));
    }
}
