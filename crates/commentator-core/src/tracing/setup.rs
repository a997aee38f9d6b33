//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "COMMENTATOR_LOG";

/// Initialize the logging system.
///
/// Reads `COMMENTATOR_LOG` for per-module log levels, e.g.
/// `COMMENTATOR_LOG=commentator_analysis::structure=debug,commentator=info`.
///
/// Falls back to `info` (or `debug` when `verbose`) for the commentator
/// crates if the variable is unset or invalid.
///
/// Idempotent: calling it multiple times is safe.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "commentator={level},commentator_core={level},commentator_analysis={level}"
            ))
        });

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(verbose)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}
