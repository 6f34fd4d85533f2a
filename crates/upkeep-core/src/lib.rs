//! Upkeep Core Library
//!
//! Shared machinery for the `update-deps` and `update-template` tools:
//! bounded subprocess execution, PATH tool resolution, lockfile whitespace
//! normalization, signed git finalization, and a batch orchestrator that
//! fans a per-repository pipeline out over many repositories while
//! isolating and aggregating their failures.

pub mod batch;
pub mod deps;
pub mod error;
pub mod exec;
pub mod git;
pub mod locate;
pub mod lockfile;
pub mod request;
pub mod telemetry;
pub mod template;

pub use batch::{run_each, BatchError, BatchOutcome};
pub use deps::{run_update, update_repository, DepsToolset, DEPS_STYLE};
pub use error::{Result, RunError, UpkeepError};
pub use exec::CommandRunner;
pub use git::{Git, SignedRefStyle};
pub use locate::{locate, locate_optional};
pub use request::{SyncAction, SyncRequest, UpdateRequest};
pub use telemetry::init_tracing;
pub use template::{run_sync, sync_repository, TEMPLATE_BRANCH, TEMPLATE_REMOTE, TEMPLATE_STYLE};

/// Upkeep version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
