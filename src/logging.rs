//! Structured logging setup
//!
//! Logs go to stderr so JSON output on stdout stays machine-readable. The
//! filter comes from `RUST_LOG` when set, otherwise from the verbosity chosen
//! on the command line.

use std::io;
use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter directive for a verbosity count (`-v`, `-vv`)
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "transitgate=warn",
        1 => "transitgate=info",
        2 => "transitgate=debug",
        _ => "transitgate=trace",
    }
}

/// Installs the global subscriber once; later calls are no-ops
pub fn init(verbosity: u8) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let result = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init();

        if result.is_err() {
            tracing::debug!("Global tracing subscriber already set");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive(0), "transitgate=warn");
        assert_eq!(default_directive(1), "transitgate=info");
        assert_eq!(default_directive(2), "transitgate=debug");
        assert_eq!(default_directive(9), "transitgate=trace");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(0);
        init(2);
    }
}
