//! `artix-checkupdates` client

use std::path::{Path, PathBuf};
use std::sync::Arc;

use checkupdates_exec::{CommandResult, CommandRunner, LocalRunner};
use tokio::runtime::Handle;
use tracing::{debug, info, instrument, warn};

use crate::config::CheckupdatesConfig;
use crate::error::{CheckupdatesError, LOCKED_DATABASE};
use crate::lockfile::{self, CleanupOutcome};
use crate::parse::parse_output;
use crate::types::{FetchMode, UpdateRecord};

/// Runs `artix-checkupdates` and turns its output into [`UpdateRecord`]s
///
/// Every fetch spawns its own process; clones share nothing but the runner.
#[derive(Clone)]
pub struct Checkupdates {
    /// Runner used to spawn the scanner
    runner: Arc<dyn CommandRunner>,
    /// Client settings
    config: CheckupdatesConfig,
    /// Resolved cache/lock directory
    lock_dir: Option<PathBuf>,
}

impl std::fmt::Debug for Checkupdates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Checkupdates")
            .field("runner", &self.runner.runner_type())
            .field("config", &self.config)
            .field("lock_dir", &self.lock_dir)
            .finish()
    }
}

impl Default for Checkupdates {
    fn default() -> Self {
        Self::new()
    }
}

impl Checkupdates {
    /// Create a client with default settings running the scanner locally
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CheckupdatesConfig::default())
    }

    /// Create a client with custom settings running the scanner locally
    #[must_use]
    pub fn with_config(config: CheckupdatesConfig) -> Self {
        Self::with_runner(config, Arc::new(LocalRunner::new()))
    }

    /// Create a client with a custom command runner
    ///
    /// # Arguments
    /// * `config` - Client settings
    /// * `runner` - Runner used to spawn the scanner
    pub fn with_runner(config: CheckupdatesConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let lock_dir = config.lock_dir.clone().or_else(lockfile::default_lock_dir);
        Self {
            runner,
            config,
            lock_dir,
        }
    }

    /// Client settings
    #[must_use]
    pub fn config(&self) -> &CheckupdatesConfig {
        &self.config
    }

    /// Directory removed when the scanner gets stuck or finds its database locked
    #[must_use]
    pub fn lock_dir(&self) -> Option<&Path> {
        self.lock_dir.as_deref()
    }

    /// Packages with a newer version upstream
    ///
    /// # Errors
    /// See [`Checkupdates::checkupdates`]
    pub async fn fetch_upgradable(
        &self,
        compliance: bool,
    ) -> Result<Vec<UpdateRecord>, CheckupdatesError> {
        self.checkupdates(FetchMode::Upgradable, compliance).await
    }

    /// Packages that moved between upstream repositories
    ///
    /// # Errors
    /// See [`Checkupdates::checkupdates`]
    pub async fn fetch_movable(
        &self,
        compliance: bool,
    ) -> Result<Vec<UpdateRecord>, CheckupdatesError> {
        self.checkupdates(FetchMode::Movable, compliance).await
    }

    /// Loosely matched repository moves
    ///
    /// # Errors
    /// See [`Checkupdates::checkupdates`]
    pub async fn fetch_loose_movable(
        &self,
        compliance: bool,
    ) -> Result<Vec<UpdateRecord>, CheckupdatesError> {
        self.checkupdates(FetchMode::LooseMovable, compliance).await
    }

    /// Run the scanner in `mode` and parse its output
    ///
    /// With `compliance` set, basenames go through
    /// [`apply_compliance`](crate::compliance::apply_compliance).
    ///
    /// # Errors
    /// - `Timeout` if the scanner did not finish in time
    /// - `Exited` / `ToolError` / `Terminated` if it failed or wrote to stderr
    /// - `Spawn` / `Io` if it could not be run
    /// - `UnrecognizedRepository` in strict mode
    #[instrument(skip(self), fields(program = %self.config.program))]
    pub async fn checkupdates(
        &self,
        mode: FetchMode,
        compliance: bool,
    ) -> Result<Vec<UpdateRecord>, CheckupdatesError> {
        let output = self.run_scanner(mode).await?;
        let records = parse_output(&output, compliance);

        if self.config.strict_repositories
            && let Some((record, tag)) = records
                .iter()
                .find_map(|r| r.unrecognized_repository().map(|tag| (r, tag)))
        {
            return Err(CheckupdatesError::UnrecognizedRepository {
                basename: record.basename.clone(),
                tag: tag.to_string(),
            });
        }

        info!(mode = %mode, count = records.len(), "fetched update records");

        Ok(records)
    }

    /// Remove the scanner's cache/lock directory, logging instead of failing
    pub async fn clean_up_lockfiles(&self) -> CleanupOutcome {
        match &self.lock_dir {
            Some(dir) => lockfile::clean_up_lockfiles(dir).await,
            None => {
                warn!("no user cache directory, skipping lock cleanup");
                CleanupOutcome::Missing
            }
        }
    }

    /// Spawn the scanner and return its stdout on a clean exit
    async fn run_scanner(&self, mode: FetchMode) -> Result<String, CheckupdatesError> {
        let timeout = self.config.timeout();

        debug!(mode = %mode, flag = mode.flag(), timeout = ?timeout, "running scanner");

        let result = match self
            .runner
            .run_with_timeout(&self.config.program, &[mode.flag()], timeout)
            .await
        {
            Ok(result) => result,
            Err(err) if err.is_timeout() => {
                self.clean_up_lockfiles().await;
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        if result.clean_exit() {
            return Ok(result.stdout);
        }

        if result.stderr.contains(LOCKED_DATABASE) {
            self.spawn_lock_cleanup();
        }

        Err(failure(result))
    }

    /// Detached cleanup; the failing fetch does not wait for it
    ///
    /// Needs a tokio runtime. Without one the cleanup is skipped and logged.
    fn spawn_lock_cleanup(&self) {
        let Ok(handle) = Handle::try_current() else {
            warn!(
                lock_dir = ?self.lock_dir,
                "no tokio runtime, skipping lock cleanup after locked database"
            );
            return;
        };
        let client = self.clone();
        handle.spawn(async move {
            client.clean_up_lockfiles().await;
        });
    }
}

/// Error for a scan that exited non-zero or wrote to stderr
fn failure(result: CommandResult) -> CheckupdatesError {
    match result.status {
        Some(code) if code != 0 => CheckupdatesError::Exited {
            code,
            stderr: result.stderr,
        },
        _ if result.has_stderr() => CheckupdatesError::ToolError(result.stderr),
        _ => CheckupdatesError::Terminated,
    }
}
