//! Tracing initialisation for the CLI.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter, e.g. `SHIFT_ROSTER_LOG=shift_roster=debug`.
pub const LOG_ENV: &str = "SHIFT_ROSTER_LOG";

/// Installs the global subscriber.
///
/// Falls back to `shift_roster=info` when `SHIFT_ROSTER_LOG` is unset or
/// unparsable. Calling it more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("shift_roster=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
