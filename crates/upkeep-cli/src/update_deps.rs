//! `update-deps` — bump JavaScript dependencies across repositories.
//!
//! For every input repository: run `ncu --upgrade`, dedupe the npm and
//! pnpm lockfiles, trim `package-lock.json`, then stage, sign-commit, and
//! re-point the `latest` tag. Repositories run concurrently; failures are
//! aggregated and reported together at exit.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use upkeep_core::{init_tracing, run_update, UpdateRequest};

#[derive(Parser)]
#[command(name = "update-deps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Update JavaScript dependencies across repositories", long_about = None)]
struct Cli {
    /// Only upgrade packages matching this filter (forwarded to ncu)
    #[arg(short, long)]
    filter: Option<String>,

    /// Repositories to update (must exist)
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

    let request = UpdateRequest::new(cli.filter, cli.inputs)?;
    run_update(&request).await?;

    Ok(())
}
