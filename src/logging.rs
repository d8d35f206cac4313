//! Tracing setup.
//!
//! `RUST_LOG` wins over the configured level. Plain commands log to stderr; the
//! TUI owns the terminal, so it logs to a file in the cache directory instead.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Path of the TUI log file, if a cache directory exists
pub fn log_file_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("anew").join("anew.log"))
}

fn open_log_file() -> Option<File> {
    let path = log_file_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok()?;
    }
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init(level: &str, target: LogTarget) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let result = match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogTarget::File => match open_log_file() {
            Some(file) => tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init(),
            // Nowhere to write without breaking the screen
            None => Ok(()),
        },
    };

    if let Err(e) = result {
        eprintln!("Warning: logging already initialised: {}", e);
    }
}
