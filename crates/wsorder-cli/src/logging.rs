use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

pub(crate) const LOG_ENV: &str = "WSORDER_LOG";

/// Installs the stderr subscriber. `WSORDER_LOG` takes precedence over `-v`.
pub(crate) fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .compact()
        .try_init();
}

pub(crate) fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
