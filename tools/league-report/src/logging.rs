//! Logging and tracing setup

use anyhow::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with a level and output format.
///
/// `RUST_LOG` takes precedence over `level` when set. Logs go to stderr so
/// report output on stdout stays clean.
pub fn initialize_logging(level: &str, format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    let fmt_layer = match format {
        "json" => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .boxed(),
        _ => fmt::layer()
            .with_target(false)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()?;

    Ok(())
}
