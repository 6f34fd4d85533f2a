//! Error types for the upkeep pipelines.
//!
//! Failures split into two tiers: preconditions (missing required tools,
//! unresolvable input paths) abort a batch before any repository work
//! begins, while per-repository failures are captured by the orchestrator
//! and surfaced together as one [`BatchError`](crate::batch::BatchError).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while running a single repository pipeline or resolving
/// its preconditions.
#[derive(Debug, Error)]
pub enum UpkeepError {
    /// A required executable could not be found on PATH.
    #[error("required tool not found on PATH: {tool}")]
    ToolNotFound { tool: String },

    /// An external command exited with a non-zero status.
    #[error("command exited with status {status}: {stderr}")]
    ProcessFailed { status: i32, stderr: String },

    /// A child process could not be spawned or waited on.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Reading or rewriting a lockfile failed (including strict UTF-8
    /// decode failures).
    #[error("lockfile error at {path:?}: {source}")]
    Lockfile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An input repository path could not be resolved to an existing
    /// directory.
    #[error("repository path {path:?} is not accessible: {source}")]
    InvalidRepo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convenience result alias.
pub type Result<T> = std::result::Result<T, UpkeepError>;

/// Top-level outcome of one batch invocation.
///
/// Precondition failures propagate before any pipeline starts; batch
/// failures are raised only after every pipeline has finished.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Precondition(#[from] UpkeepError),

    #[error(transparent)]
    Batch(#[from] crate::batch::BatchError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_not_found_displays_tool_name() {
        let err = UpkeepError::ToolNotFound {
            tool: "pnpm".to_string(),
        };
        assert!(err.to_string().contains("pnpm"));
    }

    #[test]
    fn process_failed_displays_status_and_stderr() {
        let err = UpkeepError::ProcessFailed {
            status: 128,
            stderr: "fatal: not a git repository".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("128"));
        assert!(msg.contains("not a git repository"));
    }

    #[test]
    fn invalid_repo_displays_path() {
        let err = UpkeepError::InvalidRepo {
            path: PathBuf::from("/missing/repo"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such directory"),
        };
        assert!(err.to_string().contains("/missing/repo"));
    }
}
