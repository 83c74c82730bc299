//! Error types for checkupdates

use std::time::Duration;

use checkupdates_exec::ExecError;
use thiserror::Error;

/// Text `artix-checkupdates` prints when another scan holds its database lock
pub const LOCKED_DATABASE: &str = "unable to lock database";

/// Errors that can occur while fetching updates
#[derive(Error, Debug, Clone)]
pub enum CheckupdatesError {
    /// The scanner did not finish in time and was killed
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// The scanner exited with a non-zero status
    #[error("exited with {code}")]
    Exited {
        /// Exit status
        code: i32,
        /// Whatever the scanner wrote to stderr
        stderr: String,
    },

    /// The scanner wrote to stderr without a failing exit code
    #[error("{0}")]
    ToolError(String),

    /// The scanner was terminated by a signal and printed nothing to stderr
    #[error("terminated by signal")]
    Terminated,

    /// The scanner could not be started
    #[error("failed to start scanner: {0}")]
    Spawn(String),

    /// Reading the scanner's output failed
    #[error("I/O error: {0}")]
    Io(String),

    /// A repository column held a tag outside the known set
    #[error("unrecognized repository tag {tag:?} for package {basename:?}")]
    UnrecognizedRepository {
        /// Basename of the offending record
        basename: String,
        /// Raw tag text
        tag: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CheckupdatesError {
    /// Check if the scan was killed by the timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, CheckupdatesError::Timeout { .. })
    }

    /// Check if the scanner reported its database as locked
    #[must_use]
    pub fn is_lock_conflict(&self) -> bool {
        match self {
            CheckupdatesError::Exited { stderr, .. } | CheckupdatesError::ToolError(stderr) => {
                stderr.contains(LOCKED_DATABASE)
            }
            _ => false,
        }
    }
}

impl From<ExecError> for CheckupdatesError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Timeout { timeout } => CheckupdatesError::Timeout { timeout },
            ExecError::SpawnError(e) => CheckupdatesError::Spawn(e),
            ExecError::IoError(e) => CheckupdatesError::Io(e),
        }
    }
}
