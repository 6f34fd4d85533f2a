//! `update-template` — merge upstream template changes into forked
//! repositories.
//!
//! `update` fetches and merges the upstream template branch with a signed
//! merge commit; `continue` finishes a previously staged merge after
//! manual conflict resolution. Both refresh the signed `rolling` tag.
//! Repositories run concurrently; failures are aggregated and reported
//! together at exit.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::Level;

use upkeep_core::{init_tracing, run_sync, SyncAction, SyncRequest};

#[derive(Clone, Copy, ValueEnum)]
enum Action {
    /// Commit a manually resolved template merge and refresh the tag
    Continue,
    /// Fetch and merge the upstream template branch
    Update,
}

impl From<Action> for SyncAction {
    fn from(action: Action) -> Self {
        match action {
            Action::Continue => SyncAction::Continue,
            Action::Update => SyncAction::Update,
        }
    }
}

#[derive(Parser)]
#[command(name = "update-template")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge template updates into forked repositories", long_about = None)]
struct Cli {
    /// Workflow to apply to every repository
    #[arg(value_enum)]
    action: Action,

    /// Repositories to sync (must exist)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json, level);

    let request = SyncRequest::new(cli.action.into(), cli.inputs)?;
    run_sync(&request).await?;

    Ok(())
}
