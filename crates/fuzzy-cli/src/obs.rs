//! Logging setup.

use anyhow::{Context, Result};

/// Install a stderr `tracing` subscriber.
///
/// `FUZZY_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = std::env::var("FUZZY_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&filter)
        .with_context(|| format!("invalid log filter '{filter}'"))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
