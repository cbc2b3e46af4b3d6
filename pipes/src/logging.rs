//! Logging setup
//!
//! Logs go to stderr; stdout belongs to the host engine. The filter is read
//! from `PIPES_LOG` (e.g. `debug`, `pipes=debug,reqwest=info`) and defaults
//! to `info`.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "PIPES_LOG";

/// Install the global subscriber. Returns false when one is already set, so
/// repeated calls from tests or multiple provider instances are harmless.
pub fn init_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}
