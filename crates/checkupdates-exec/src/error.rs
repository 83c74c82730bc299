//! Error types for checkupdates-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running a local process
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Process could not be started
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error while reading process output or waiting for exit
    #[error("I/O error: {0}")]
    IoError(String),

    /// Process did not exit before the deadline and was killed
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },
}

impl ExecError {
    /// Check if the process was killed because of the timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ExecError::Timeout { .. })
    }
}
