//! File logging for the editor.
//!
//! The terminal belongs to the TUI, so logs go to a daily rotated file
//! under the user's local data directory
//! (`~/.local/share/formula/logs/formula.log` on Linux).
//!
//! Filtering follows `RUST_LOG`, defaulting to `info`:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=formula::fields=debug` - module-level filtering

use std::io;
use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log file name prefix; the appender adds the date.
pub const LOG_FILE: &str = "formula.log";

/// Directory holding the log files.
pub fn logs_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("formula").join("logs"))
}

fn ensure_logs_dir() -> io::Result<PathBuf> {
    let dir = logs_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no local data directory"))?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Install the global subscriber.
///
/// Call once, before the terminal enters TUI mode. Failure to create the
/// log directory is reported on stderr and leaves logging disabled.
pub fn init() {
    let logs_dir = match ensure_logs_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE);

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Warning: Logging already initialized: {}", e);
    }
}
