//! Tracing bootstrap.

use anyhow::{Context, Result};
use tracing_subscriber::prelude::*;

/// Install the global subscriber.
///
/// `level` is normally [`DriverConfig::log_level`](crate::DriverConfig), which
/// `DOMDRIVER_LOG` overrides at load time. `RUST_LOG`, when set, replaces it
/// with a full filter directive; `debug` forces `DEBUG` for the engine's
/// per-attempt poll and dispatch logs.
pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_levels() {
        let err = init_logging("chatty", false).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }

    #[test]
    fn debug_flag_overrides_the_configured_level() {
        // may fail only because another test already installed a subscriber
        if let Err(err) = init_logging("chatty", true) {
            assert!(!err.to_string().contains("Invalid log level"), "{err:#}");
        }
    }
}
