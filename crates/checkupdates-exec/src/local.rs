//! Local process execution using `tokio::process`

use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, instrument, warn};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::CommandRunner;

/// How long to keep reading output once the process has exited
const OUTPUT_GRACE: Duration = Duration::from_millis(500);

/// Local process runner
///
/// Executes a program directly (no shell) on the local machine. Output of
/// both streams is accumulated in arrival order; every stderr chunk is also
/// forwarded to `tracing` as it arrives. The timeout covers the process
/// itself; pipes left open by its descendants are only read for a short
/// grace period after it exits.
#[derive(Debug, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    async fn execute(
        &self,
        program: &str,
        args: &[&str],
        limit: Option<Duration>,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        debug!(program = %program, args = ?args, "spawning local process");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError(format!("{program}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecError::IoError("stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecError::IoError("stderr was not captured".to_string()))?;

        let (stdout_buf, mut stdout_task) = spawn_reader(stdout, None);
        let (stderr_buf, mut stderr_task) = spawn_reader(stderr, Some(program.to_string()));

        let status = match limit {
            Some(limit) => {
                let waited = timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status,
                    Err(_) => {
                        error!(
                            program = %program,
                            timeout = ?limit,
                            elapsed = ?start.elapsed(),
                            "process timed out, killing it"
                        );
                        if let Err(e) = child.kill().await {
                            warn!(program = %program, error = %e, "failed to kill timed-out process");
                        }
                        stdout_task.abort();
                        stderr_task.abort();
                        return Err(ExecError::Timeout { timeout: limit });
                    }
                }
            }
            None => child.wait().await,
        };
        let status = match status {
            Ok(status) => status,
            Err(e) => {
                stdout_task.abort();
                stderr_task.abort();
                return Err(ExecError::IoError(e.to_string()));
            }
        };

        // A descendant may still hold the pipes open after the process exited
        let drained = timeout(OUTPUT_GRACE, async {
            ((&mut stdout_task).await, (&mut stderr_task).await)
        })
        .await;
        match drained {
            Ok((stdout_joined, stderr_joined)) => {
                for joined in [stdout_joined, stderr_joined] {
                    joined
                        .map_err(|e| ExecError::IoError(e.to_string()))?
                        .map_err(|e| ExecError::IoError(e.to_string()))?;
                }
            }
            Err(_) => {
                debug!(
                    program = %program,
                    grace = ?OUTPUT_GRACE,
                    "output pipes still open after exit, keeping what was read"
                );
                stdout_task.abort();
                stderr_task.abort();
            }
        }

        let stdout = take_buffer(&stdout_buf);
        let stderr = take_buffer(&stderr_buf);
        let duration = start.elapsed();

        let result = CommandResult {
            status: status.code(),
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            duration,
        };

        debug!(
            program = %program,
            status = ?result.status,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            duration = ?duration,
            "process exited"
        );

        Ok(result)
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

type Buffer = Arc<Mutex<Vec<u8>>>;

/// Read a pipe on its own task so the process exit is not tied to pipe EOF
fn spawn_reader<R>(reader: R, forward: Option<String>) -> (Buffer, JoinHandle<std::io::Result<()>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer = Buffer::default();
    let sink = Arc::clone(&buffer);
    let handle =
        tokio::spawn(async move { read_stream(reader, &sink, forward.as_deref()).await });
    (buffer, handle)
}

/// Drain a pipe into `sink`. When `forward` names the program, each chunk
/// is also logged as it arrives.
async fn read_stream<R>(
    mut reader: R,
    sink: &Mutex<Vec<u8>>,
    forward: Option<&str>,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        if let Some(program) = forward {
            let text = String::from_utf8_lossy(&chunk[..n]);
            warn!(program = %program, stderr = %text.trim_end(), "process wrote to stderr");
        }
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(&chunk[..n]);
    }
}

fn take_buffer(buffer: &Mutex<Vec<u8>>) -> Vec<u8> {
    std::mem::take(&mut *buffer.lock().unwrap_or_else(PoisonError::into_inner))
}

#[async_trait]
impl CommandRunner for LocalRunner {
    #[instrument(skip(self), level = "debug")]
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandResult, ExecError> {
        self.execute(program, args, None).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout_duration: Duration,
    ) -> Result<CommandResult, ExecError> {
        self.execute(program, args, Some(timeout_duration)).await
    }

    fn runner_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_success() {
        let runner = LocalRunner::new();
        let result = runner.run("sh", &["-c", "echo hello"]).await.unwrap();

        assert!(result.clean_exit());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_failure() {
        let runner = LocalRunner::new();
        let result = runner.run("sh", &["-c", "exit 42"]).await.unwrap();

        assert!(!result.success());
        assert_eq!(result.status, Some(42));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let runner = LocalRunner::new();
        let start = Instant::now();
        let result = runner
            .run_with_timeout("sh", &["-c", "sleep 5"], Duration::from_millis(100))
            .await;

        assert!(result.unwrap_err().is_timeout());
        assert!(start.elapsed() >= Duration::from_millis(100));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_run_with_stderr() {
        let runner = LocalRunner::new();
        let result = runner.run("sh", &["-c", "echo error >&2"]).await.unwrap();

        assert!(result.success());
        assert!(!result.clean_exit());
        assert_eq!(result.stderr.trim(), "error");
    }

    #[tokio::test]
    async fn test_stdout_chunks_keep_arrival_order() {
        let runner = LocalRunner::new();
        let result = runner
            .run(
                "sh",
                &["-c", "echo one; sleep 0.05; echo two; sleep 0.05; echo three"],
            )
            .await
            .unwrap();

        assert_eq!(result.stdout, "one\ntwo\nthree\n");
    }

    #[tokio::test]
    async fn test_exit_does_not_wait_for_inherited_pipes() {
        let runner = LocalRunner::new();
        let start = Instant::now();
        let result = runner
            .run_with_timeout(
                "sh",
                &["-c", "echo done; sleep 3 & exit 0"],
                Duration::from_secs(2),
            )
            .await
            .unwrap();

        assert!(result.clean_exit());
        assert_eq!(result.stdout, "done\n");
        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stderr_is_forwarded_to_tracing() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let runner = LocalRunner::new();
        let result = runner
            .run("sh", &["-c", "echo 'database is stale' >&2"])
            .await
            .unwrap();

        assert_eq!(result.stderr.trim(), "database is stale");
        let captured = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(captured.contains("WARN"), "captured: {captured}");
        assert!(captured.contains("database is stale"), "captured: {captured}");
    }

    #[tokio::test]
    async fn test_spawn_error() {
        let runner = LocalRunner::new();
        let result = runner.run("/nonexistent/checkupdates-binary", &[]).await;

        assert!(matches!(result, Err(ExecError::SpawnError(_))));
    }
}
