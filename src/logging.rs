//! Diagnostic logging setup.
//!
//! The terminal is owned by the TUI, so diagnostics never go to stderr
//! while the chat is running. When a log file is requested, a
//! `tracing-subscriber` fmt layer writes there instead, filtered through
//! `RUST_LOG` with a `charla=debug` default.

use std::error::Error;
use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

pub fn init(log_file: Option<&str>) -> Result<(), Box<dyn Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("charla=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
