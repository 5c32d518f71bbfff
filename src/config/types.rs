//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_EXPIRY_THRESHOLD_DAYS, DEFAULT_LOG_RETENTION, DEFAULT_PORT, DEFAULT_SMTP_PORT,
    MAX_EXPIRY_THRESHOLD_DAYS, MAX_LOG_RETENTION, PROGRAM_NAME, TCP_CONNECT_TIMEOUT_SECS,
    TLS_HANDSHAKE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Highest TLS version the probe offers.
///
/// The floor is always TLS 1.2. `Tls12` pins the legacy 1.2 ceiling for
/// endpoints that misbehave when offered 1.3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TlsCeiling {
    /// Offer TLS 1.2 only
    #[value(name = "1.2")]
    Tls12,
    /// Offer TLS 1.2 and TLS 1.3 (default)
    #[value(name = "1.3")]
    Tls13,
}

/// Run configuration.
///
/// Parsed once from the command line (or built programmatically via
/// `Default`) and never mutated after validation.
///
/// # Examples
///
/// ```bash
/// # One host, default port 443, default 20 day threshold
/// cert_expiry_monitor --host example.com
///
/// # Several hosts and ports, email alerts to ops
/// cert_expiry_monitor -H mail.example.com,www.example.com -p 443,8443 \
///     --to ops@example.com --from monitor@example.com
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cert_expiry_monitor",
    about = "Checks TLS certificate expiry on host:port endpoints and alerts before they expire."
)]
pub struct Config {
    /// Host names to probe (repeatable or comma-separated)
    #[arg(short = 'H', long = "host", required = true, num_args = 1.., value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// Ports to probe on every host (repeatable or comma-separated)
    #[arg(short = 'p', long = "port", num_args = 1.., value_delimiter = ',', default_values_t = [DEFAULT_PORT])]
    pub ports: Vec<u16>,

    /// Alert when fewer than this many days remain before a certificate expires
    #[arg(
        long,
        default_value_t = DEFAULT_EXPIRY_THRESHOLD_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_EXPIRY_THRESHOLD_DAYS)
    )]
    pub expiry_threshold_days: i64,

    /// Sender address for alert emails (defaults to the program name at the recipient's domain)
    #[arg(long = "from")]
    pub mail_from: Option<String>,

    /// Recipient address for alert emails; alerts are disabled when absent
    #[arg(long = "to")]
    pub mail_to: Option<String>,

    /// SMTP servers to submit alerts through; resolved from the recipient's MX records when absent
    #[arg(long = "smtp-server", num_args = 1.., value_delimiter = ',')]
    pub smtp_servers: Vec<String>,

    /// SMTP submission port (STARTTLS)
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    pub smtp_port: u16,

    /// SMTP user name; the password is read from CERT_MONITOR_SMTP_PASSWORD
    #[arg(long, env = "CERT_MONITOR_SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// Accept any server certificate so expired or untrusted ones can still be read
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub ignore_validation_issues: bool,

    /// Number of transcript files to keep
    #[arg(
        long,
        default_value_t = DEFAULT_LOG_RETENTION,
        value_parser = clap::value_parser!(u32).range(1..=MAX_LOG_RETENTION as i64)
    )]
    pub log_retention: u32,

    /// Directory for run transcripts (defaults to a per-user data directory)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// TCP connect timeout in seconds
    #[arg(long, default_value_t = TCP_CONNECT_TIMEOUT_SECS)]
    pub connect_timeout_secs: u64,

    /// TLS handshake timeout in seconds
    #[arg(long, default_value_t = TLS_HANDSHAKE_TIMEOUT_SECS)]
    pub handshake_timeout_secs: u64,

    /// Highest TLS version offered: 1.2|1.3
    #[arg(long, value_enum, default_value_t = TlsCeiling::Tls13)]
    pub max_tls_version: TlsCeiling,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            ports: vec![DEFAULT_PORT],
            expiry_threshold_days: DEFAULT_EXPIRY_THRESHOLD_DAYS,
            mail_from: None,
            mail_to: None,
            smtp_servers: Vec::new(),
            smtp_port: DEFAULT_SMTP_PORT,
            smtp_username: None,
            ignore_validation_issues: true,
            log_retention: DEFAULT_LOG_RETENTION,
            log_dir: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            connect_timeout_secs: TCP_CONNECT_TIMEOUT_SECS,
            handshake_timeout_secs: TLS_HANDSHAKE_TIMEOUT_SECS,
            max_tls_version: TlsCeiling::Tls13,
        }
    }
}

impl Config {
    /// TCP connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// TLS handshake timeout as a `Duration`.
    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    /// Directory the run transcript is written to.
    ///
    /// Uses `--log-dir` when given, otherwise `<data_local_dir>/<program>/logs`,
    /// falling back to the system temp directory when no per-user directory exists.
    pub fn resolved_log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(PROGRAM_NAME)
            .join("logs")
    }

    /// Domain part of the recipient address, if any.
    pub fn recipient_domain(&self) -> Option<&str> {
        self.mail_to
            .as_deref()
            .and_then(|to| to.rsplit_once('@'))
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty())
    }

    /// Sender address for alerts.
    ///
    /// Falls back to `<program>@<recipient domain>` when `--from` is absent.
    pub fn sender_address(&self) -> Option<String> {
        match &self.mail_from {
            Some(from) => Some(from.clone()),
            None => self
                .recipient_domain()
                .map(|domain| format!("{PROGRAM_NAME}@{domain}")),
        }
    }
}
