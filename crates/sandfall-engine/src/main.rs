//! # Sandfall
//!
//! Main entry point: loads `sandfall.toml` (or the path given as the first
//! argument), then runs the scripted headless session.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use sandfall_engine::SimConfig;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("sandfall=info".parse()?))
        .init();

    info!("Sandfall starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut config = match std::env::args().nth(1) {
        Some(path) => SimConfig::load_from(path),
        None => SimConfig::load(),
    };
    config.validate();

    let summary = sandfall_engine::run(&config)?;
    for (kind, count) in summary.counts.iter().filter(|(_, n)| *n > 0) {
        info!("{:>6} {}", count, kind.name());
    }

    info!("Sandfall shutdown complete (seed {})", summary.seed);
    Ok(())
}
