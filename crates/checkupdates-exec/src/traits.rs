//! Command runner trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs a program with arguments and captures its output
///
/// Implementations only report how the process ended. Deciding whether a
/// non-zero exit or stderr output is a failure is left to the caller.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the program to completion
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError>;

    /// Run the program, killing it if it has not exited within `timeout`
    ///
    /// # Errors
    /// Returns `ExecError::Timeout` when the deadline elapses first
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Short name of the runner, used in logs
    fn runner_type(&self) -> &'static str;
}
