//! Logger initialization.
//!
//! Log records go to stderr and, when a transcript file is supplied, are
//! copied into it with terminal color codes removed.

use std::fs::File;
use std::io::{self, Write};
use std::sync::LazyLock;

use crate::config::LogFormat;
use crate::error_handling::InitializationError;
use colored::*;
use env_logger::Target;
use log::LevelFilter;
use regex::bytes::Regex;

static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;]*[A-Za-z]").expect("ANSI escape pattern is valid")
});

/// Removes ANSI color sequences from a formatted record.
fn strip_ansi(bytes: &[u8]) -> std::borrow::Cow<'_, [u8]> {
    ANSI_ESCAPE.replace_all(bytes, &b""[..])
}

/// Writes every record to stderr and a plain copy to the transcript.
struct TranscriptTee {
    file: File,
}

impl Write for TranscriptTee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // stderr problems must not lose the transcript copy
        let _ = io::stderr().write_all(buf);
        self.file.write_all(&strip_ansi(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. Supports both plain text
/// (with colors and emojis) and JSON formats for structured logging.
///
/// The logger reads from the `RUST_LOG` environment variable by default, but
/// the provided `level` parameter will override it.
///
/// # Arguments
///
/// * `level` - Minimum log level to display (overrides `RUST_LOG` if set)
/// * `format` - Log format (Plain or Json)
/// * `transcript` - File receiving an uncolored copy of every record
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already installed.
///
/// # Examples
///
/// ```bash
/// # Per-module filtering via RUST_LOG
/// RUST_LOG=cert_expiry_monitor=debug,rustls=info cert_expiry_monitor -H example.com
/// ```
pub fn init_logger_with(
    level: LevelFilter,
    format: LogFormat,
    transcript: Option<File>,
) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    // Read from RUST_LOG environment variable first, then override with CLI arg
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("rustls", LevelFilter::Warn);
    builder.filter_module("lettre", LevelFilter::Warn);
    // hickory logs malformed UDP answers it already recovers from
    builder.filter_module("hickory_proto", LevelFilter::Error);
    builder.filter_module("hickory_resolver", LevelFilter::Warn);
    builder.filter_module("cert_expiry_monitor", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                let emoji = match level {
                    log::Level::Error => "❌",
                    log::Level::Warn => "⚠️",
                    log::Level::Info => "✔️",
                    log::Level::Debug => "🔍",
                    log::Level::Trace => "🔬",
                };

                writeln!(
                    buf,
                    "{} {} {} [{}] {}",
                    emoji,
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    if let Some(file) = transcript {
        builder.target(Target::Pipe(Box::new(TranscriptTee { file })));
    }

    // try_init so repeated initialization in tests returns an error instead of panicking
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}
