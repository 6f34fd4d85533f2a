//! Bounded subprocess execution.
//!
//! Every child process holds one permit from a shared counting semaphore
//! for its entire lifetime: acquired before the spawn, released only after
//! both output streams have been fully drained. The cap therefore bounds
//! concurrently *running* processes, not merely concurrent launches.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::thread;

use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::error::{Result, UpkeepError};

/// Permit count used when host parallelism cannot be detected.
const FALLBACK_PERMITS: usize = 4;

/// Runs external commands under a shared concurrency cap.
///
/// The runner is explicitly constructed and passed into every call site;
/// clones share the same permit pool. Children receive no stdin, and both
/// output streams are captured rather than inherited.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    permits: Arc<Semaphore>,
}

impl CommandRunner {
    /// Create a runner with an explicit permit count (minimum 1).
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Create a runner sized to the host's detected parallelism, falling
    /// back to a fixed constant when detection fails.
    pub fn with_host_parallelism() -> Self {
        let permits = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(FALLBACK_PERMITS);
        Self::new(permits)
    }

    /// Run `program` with `args`, inheriting the current working directory.
    pub async fn run(&self, program: &Path, args: &[&str]) -> Result<()> {
        self.spawn_and_wait(program, args, None).await
    }

    /// Run `program` with `args` inside `cwd`.
    pub async fn run_in(&self, program: &Path, args: &[&str], cwd: &Path) -> Result<()> {
        self.spawn_and_wait(program, args, Some(cwd)).await
    }

    async fn spawn_and_wait(
        &self,
        program: &Path,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Result<()> {
        let launch = |source| UpkeepError::Launch {
            program: program.display().to_string(),
            source,
        };

        let output = {
            // The pool is never closed, so acquisition cannot fail in practice.
            let _permit = self.permits.acquire().await.ok();

            let mut command = Command::new(program);
            command
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            if let Some(dir) = cwd {
                command.current_dir(dir);
            }

            let child = command.spawn().map_err(launch)?;
            // wait_with_output drains both pipes to EOF before returning,
            // so the permit is held until the streams are consumed.
            child.wait_with_output().await.map_err(launch)?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        // Mirror child output even on success: tools emit warnings on stderr.
        if !stdout.is_empty() {
            info!("{stdout}");
        }
        if !stderr.is_empty() {
            error!("{stderr}");
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(UpkeepError::ProcessFailed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            })
        }
    }
}
