//! Batch fan-out with per-repository failure capture.
//!
//! One future per repository, all joined cooperatively on the current task:
//! a failing repository never cancels or skips a sibling, and the batch
//! only resolves once every pipeline has run to completion or its own
//! failure point. Failures are then surfaced together as one grouped
//! [`BatchError`].

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use futures::future::join_all;

use crate::error::UpkeepError;

/// Grouped failure for a finished batch: exactly one entry per failed
/// repository, each preserving the repository's original error.
#[derive(Debug)]
pub struct BatchError {
    total: usize,
    failures: Vec<(PathBuf, UpkeepError)>,
}

impl BatchError {
    /// Number of repositories in the batch, failed or not.
    pub fn total(&self) -> usize {
        self.total
    }

    /// The failed repositories with their original errors, in input order.
    pub fn failures(&self) -> &[(PathBuf, UpkeepError)] {
        &self.failures
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} repositories failed",
            self.failures.len(),
            self.total
        )?;
        for (repo, err) in &self.failures {
            write!(f, "\n  {}: {}", repo.display(), err)?;
        }
        Ok(())
    }
}

impl std::error::Error for BatchError {}

/// Per-repository results of one finished batch, in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    results: Vec<(PathBuf, Result<(), UpkeepError>)>,
}

impl BatchOutcome {
    /// Whether every repository pipeline completed without error.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_ok())
    }

    pub fn results(&self) -> &[(PathBuf, Result<(), UpkeepError>)] {
        &self.results
    }

    /// Collapse into `Ok(())` when no repository failed, otherwise a
    /// grouped error wrapping every constituent failure.
    pub fn into_result(self) -> Result<(), BatchError> {
        let total = self.results.len();
        let failures: Vec<_> = self
            .results
            .into_iter()
            .filter_map(|(repo, result)| result.err().map(|err| (repo, err)))
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(BatchError { total, failures })
        }
    }
}

/// Run `make(repo)` for every repository concurrently and capture each
/// outcome.
///
/// The futures are polled on the calling task, so per-repository work
/// interleaves at await points without any cross-task state. No implicit
/// cap applies here; the process runner bounds child processes itself.
pub async fn run_each<F, Fut>(repos: &[PathBuf], make: F) -> BatchOutcome
where
    F: Fn(PathBuf) -> Fut,
    Fut: Future<Output = Result<(), UpkeepError>>,
{
    let tasks = repos.iter().map(|repo| {
        let task = make(repo.clone());
        async move { (repo.clone(), task.await) }
    });
    BatchOutcome {
        results: join_all(tasks).await,
    }
}
