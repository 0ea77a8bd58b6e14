//! Tracing setup for the binary.
//!
//! Library crates only emit events; this installs the subscriber. Logs go to
//! stderr so `--json` output on stdout stays machine-readable.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `--verbose` forces `debug`. Otherwise `RUST_LOG` is honored, defaulting
/// to `error` so normal runs only show the CLI's own progress output.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter_layer = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("error"))?
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(verbose, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init() {
        // Only the first init in a process succeeds
        let _ = init(true);
        assert!(init(false).is_err());

        tracing::info!("This is an info message");
        tracing::warn!("This is a warning message");
    }
}
