//! Centralised tracing initialisation for the upkeep binaries.
//!
//! Call [`init_tracing`] once at program start. Captured subprocess output
//! is mirrored through this subscriber: stdout at `info!`, stderr at
//! `error!`.
//!
//! Safe to call more than once; the global subscriber can only be set once
//! per process, so later calls are silently ignored.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// The fallback filter scopes `level` to the upkeep crates and caps
// everything else at `warn`, so mirrored subprocess output stays visible
// at `-v` without dependency internals flooding the log.
fn default_directives(level: Level) -> String {
    format!("warn,upkeep_core={level},upkeep_cli={level}")
}

/// Initialise the global tracing subscriber.
///
/// * `json` — when `true`, emit newline-delimited JSON log lines.
/// * `level` — default verbosity when `RUST_LOG` is not set.
///
/// `RUST_LOG`, when set, replaces the default filter entirely.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let format = fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(format.json()).try_init().ok();
    } else {
        registry.with(format).try_init().ok();
    }
}
