//! PATH resolution for external tools.

use std::path::PathBuf;

use crate::error::{Result, UpkeepError};

/// Resolve a required tool on PATH.
///
/// Fails with [`UpkeepError::ToolNotFound`] carrying the tool name when no
/// match exists.
pub fn locate(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| UpkeepError::ToolNotFound {
        tool: tool.to_string(),
    })
}

/// Resolve an optional tool on PATH, returning `None` when absent so the
/// caller can decide on a fallback (e.g. a one-time global install).
pub fn locate_optional(tool: &str) -> Option<PathBuf> {
    which::which(tool).ok()
}
