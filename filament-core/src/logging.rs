//! Tracing setup.
//!
//! The library only emits `tracing` events. Applications that want them on
//! stderr call [`init_logging`] once at startup; `RUST_LOG` takes precedence
//! over the default directive.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Install a global fmt subscriber filtered by `RUST_LOG`, or by
/// `default_directive` (e.g. `"info"` or `"filament_core=debug"`) when the
/// variable is unset.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(default_directive: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_reported() {
        // Another test binary may already own the global subscriber, so only
        // the second call in this process is guaranteed to fail.
        let _ = init_logging("debug");
        assert!(matches!(init_logging("debug"), Err(Error::Logging(_))));
    }
}
