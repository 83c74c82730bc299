//! Configuration for the checkupdates client

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CheckupdatesError;

/// Default scanner executable
pub const DEFAULT_PROGRAM: &str = "artix-checkupdates";

/// Default timeout in milliseconds (10 minutes)
pub const DEFAULT_TIMEOUT_MS: u64 = 600_000;

/// Settings for [`Checkupdates`](crate::Checkupdates)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckupdatesConfig {
    /// Scanner executable name or path
    pub program: String,
    /// Wall-clock limit for one scan; `0` means the default
    pub timeout_ms: u64,
    /// Cache/lock directory to clear after a stuck or locked scan
    pub lock_dir: Option<PathBuf>,
    /// Fail the fetch when a repository column holds an unknown tag
    pub strict_repositories: bool,
}

impl Default for CheckupdatesConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            lock_dir: None,
            strict_repositories: false,
        }
    }
}

impl CheckupdatesConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns `CheckupdatesError::Config` if the text is not valid TOML
    pub fn from_toml_str(content: &str) -> Result<Self, CheckupdatesError> {
        toml::from_str(content).map_err(|e| CheckupdatesError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns `CheckupdatesError::Config` if the file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, CheckupdatesError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CheckupdatesError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Effective timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        if self.timeout_ms == 0 {
            Duration::from_millis(DEFAULT_TIMEOUT_MS)
        } else {
            Duration::from_millis(self.timeout_ms)
        }
    }

    /// Set the scanner executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the lock directory
    #[must_use]
    pub fn with_lock_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.lock_dir = Some(dir.into());
        self
    }

    /// Reject records with unknown repository tags
    #[must_use]
    pub fn with_strict_repositories(mut self, strict: bool) -> Self {
        self.strict_repositories = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckupdatesConfig::default();

        assert_eq!(config.program, "artix-checkupdates");
        assert_eq!(config.timeout(), Duration::from_millis(600_000));
        assert!(config.lock_dir.is_none());
        assert!(!config.strict_repositories);
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let config = CheckupdatesConfig::default().with_timeout(Duration::ZERO);

        assert_eq!(config.timeout(), Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn test_partial_toml() {
        let config = CheckupdatesConfig::from_toml_str(
            r#"
timeout_ms = 30000
lock_dir = "/tmp/checkupdates-cache"
"#,
        )
        .unwrap();

        assert_eq!(config.program, DEFAULT_PROGRAM);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.lock_dir, Some(PathBuf::from("/tmp/checkupdates-cache")));
    }

    #[test]
    fn test_invalid_toml() {
        let result = CheckupdatesConfig::from_toml_str("timeout_ms = \"soon\"");

        assert!(matches!(result, Err(CheckupdatesError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checkupdates.toml");
        std::fs::write(&path, "program = \"/usr/local/bin/acu\"\nstrict_repositories = true\n")
            .unwrap();

        let config = CheckupdatesConfig::load(&path).unwrap();

        assert_eq!(config.program, "/usr/local/bin/acu");
        assert!(config.strict_repositories);
        assert!(CheckupdatesConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
