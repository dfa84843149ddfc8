//! Structured logging setup.
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level when set
//! - Output goes to stderr so stdout carries only response bodies

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

/// Crate logs at `level`, dependencies one notch quieter.
fn default_directives(level: &str) -> String {
    format!("warn,http_exec={level}", level = level.to_ascii_lowercase())
}
