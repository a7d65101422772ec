//! Diagnostic log setup.
//!
//! The log is append-only, timestamped and lives next to the state files.
//! Nothing reads it back; failing to open it only means no log is written.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Name of the log file inside the state directory.
pub const LOG_FILE_NAME: &str = "winmax.log";

/// Map a config log level to a tracing level (invalid values fall back to info).
pub fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Filter directives: `RUST_LOG` when set, otherwise the configured level.
pub fn filter_directives(level: &str, rust_log: Option<&str>) -> String {
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => parse_level(level).to_string().to_lowercase(),
    }
}

/// Path of the log file for a state directory.
pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE_NAME)
}

/// Open the log file for appending, creating the directory if needed.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new().create(true).append(true).open(log_path(dir))
}

/// Install the global subscriber.
///
/// With `dir` set, events go to the log file in that directory. If the file
/// cannot be opened, or `dir` is `None`, events are discarded.
pub fn init(level: &str, dir: Option<&Path>) {
    let writer = match dir.map(open_log_file) {
        Some(Ok(file)) => BoxMakeWriter::new(Mutex::new(file)),
        Some(Err(_)) | None => BoxMakeWriter::new(io::sink),
    };

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = EnvFilter::new(filter_directives(level, rust_log.as_deref()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish();

    // A subscriber may already be installed (tests); keep it.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
