//! Runs custom command actions through the platform shell.

use std::path::PathBuf;

use async_trait::async_trait;
use aura_core::error::{AuraError, Result};
use aura_core::shell::{ExecutionReport, ShellExecutor};
use tokio::process::Command;

/// Executes actions with `sh -c` (or `cmd /C` on Windows).
///
/// Output is inherited, so the action writes straight to the user's
/// terminal.
#[derive(Debug, Clone, Default)]
pub struct SystemShellExecutor {
    working_dir: Option<PathBuf>,
}

impl SystemShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self, action: &str) -> Command {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", action]);
            c
        } else {
            let mut c = Command::new("sh");
            c.args(["-c", action]);
            c
        };

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl ShellExecutor for SystemShellExecutor {
    async fn execute(&self, action: &str) -> Result<ExecutionReport> {
        tracing::debug!(action, "spawning shell action");

        let status = self
            .command(action)
            .status()
            .await
            .map_err(|e| AuraError::execution(format!("Failed to execute command: {}", e)))?;

        if status.success() {
            Ok(ExecutionReport::succeeded())
        } else {
            Ok(ExecutionReport::failed(status.code()))
        }
    }
}
