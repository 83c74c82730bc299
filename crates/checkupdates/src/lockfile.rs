//! Removal of the scanner's cache and lock directory

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

/// Directory name `artix-checkupdates` uses under the user cache root
pub const CACHE_DIR_NAME: &str = "artix-checkupdates";

/// What a cleanup attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The directory existed and was removed
    Removed,
    /// There was nothing to remove
    Missing,
    /// Removal failed; the error was logged
    Failed,
}

/// Default lock directory, `$XDG_CACHE_HOME/artix-checkupdates` or `~/.cache/artix-checkupdates`
#[must_use]
pub fn default_lock_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(CACHE_DIR_NAME))
}

/// Recursively remove `dir`
///
/// Never fails: a missing directory is fine and any other error is only logged.
pub async fn clean_up_lockfiles(dir: &Path) -> CleanupOutcome {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {
            info!(path = %dir.display(), "removed checkupdates cache directory");
            CleanupOutcome::Removed
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %dir.display(), "checkupdates cache directory already gone");
            CleanupOutcome::Missing
        }
        Err(e) => {
            error!(
                path = %dir.display(),
                error = %e,
                "failed to remove the checkupdates cache directory"
            );
            CleanupOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_removes_directory_tree() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(CACHE_DIR_NAME);
        std::fs::create_dir_all(dir.join("db.lck.d")).unwrap();
        std::fs::write(dir.join("db.lck"), b"").unwrap();

        assert_eq!(clean_up_lockfiles(&dir).await, CleanupOutcome::Removed);
        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_an_error() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join(CACHE_DIR_NAME);

        assert_eq!(clean_up_lockfiles(&dir).await, CleanupOutcome::Missing);
        assert_eq!(clean_up_lockfiles(&dir).await, CleanupOutcome::Missing);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("not-a-directory");
        std::fs::write(&file, b"x").unwrap();

        assert_eq!(clean_up_lockfiles(&file).await, CleanupOutcome::Failed);
    }

    #[test]
    fn test_default_lock_dir_name() {
        if let Some(dir) = default_lock_dir() {
            assert!(dir.ends_with(CACHE_DIR_NAME));
        }
    }
}
