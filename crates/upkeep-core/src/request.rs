//! Validated, immutable invocation arguments.
//!
//! Each tool constructs its request exactly once from parsed CLI input.
//! Construction canonicalizes every repository path (verifying existence),
//! drops duplicates while preserving first-seen order, and freezes the
//! result: the types expose read-only accessors and compare by value.

use std::fs;
use std::path::PathBuf;

use crate::error::{Result, UpkeepError};

fn resolve_inputs(inputs: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::with_capacity(inputs.len());
    for input in inputs {
        let resolved = fs::canonicalize(&input).map_err(|source| UpkeepError::InvalidRepo {
            path: input.clone(),
            source,
        })?;
        if !repos.contains(&resolved) {
            repos.push(resolved);
        }
    }
    Ok(repos)
}

/// Arguments for one `update-deps` batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateRequest {
    filter: Option<String>,
    repos: Vec<PathBuf>,
}

impl UpdateRequest {
    /// Validate and freeze the inputs.
    pub fn new(filter: Option<String>, inputs: Vec<PathBuf>) -> Result<Self> {
        Ok(Self {
            filter,
            repos: resolve_inputs(inputs)?,
        })
    }

    /// Package filter forwarded to the dependency-upgrade tool, if any.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Canonicalized repositories, in input order, duplicates removed.
    pub fn repos(&self) -> &[PathBuf] {
        &self.repos
    }
}

/// Which template-sync workflow runs for every repository in the batch.
///
/// The action is chosen once per invocation, not per repository. Values
/// outside this enum are unrepresentable; the CLI rejects unknown action
/// strings before any repository work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncAction {
    /// Commit a pre-staged merge (after manual conflict resolution) and
    /// refresh the rolling tag.
    Continue,
    /// Fetch the upstream template branch, merge it, and refresh the tag.
    Update,
}

/// Arguments for one `update-template` batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyncRequest {
    action: SyncAction,
    repos: Vec<PathBuf>,
}

impl SyncRequest {
    /// Validate and freeze the inputs.
    pub fn new(action: SyncAction, inputs: Vec<PathBuf>) -> Result<Self> {
        Ok(Self {
            action,
            repos: resolve_inputs(inputs)?,
        })
    }

    pub fn action(&self) -> SyncAction {
        self.action
    }

    /// Canonicalized repositories, in input order, duplicates removed.
    pub fn repos(&self) -> &[PathBuf] {
        &self.repos
    }
}
