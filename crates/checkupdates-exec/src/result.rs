//! Result types for command execution

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Captured outcome of a process that ran to completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResult {
    /// Exit status code, `None` when the process was terminated by a signal
    pub status: Option<i32>,
    /// Accumulated stdout
    pub stdout: String,
    /// Accumulated stderr
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Exit code 0 and nothing at all written to stderr
    #[must_use]
    pub fn clean_exit(&self) -> bool {
        self.success() && self.stderr.is_empty()
    }

    /// Whether anything was received on stderr
    #[must_use]
    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }
}
