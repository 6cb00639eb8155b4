//! Shell execution capability.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Outcome of running a shell action to completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub success: bool,
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl ExecutionReport {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            exit_code: Some(0),
        }
    }

    pub fn failed(exit_code: Option<i32>) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Runs stored custom command actions.
#[async_trait]
pub trait ShellExecutor: Send + Sync {
    /// Executes `action` through the platform shell and waits for it.
    ///
    /// `Err` means the action could not be started at all; a non-zero exit is
    /// reported through [`ExecutionReport::success`].
    async fn execute(&self, action: &str) -> Result<ExecutionReport>;
}
