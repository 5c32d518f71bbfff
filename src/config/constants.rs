//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including network timeouts, default thresholds and event log identity.

/// Program identity used for the transcript file prefix and event log source.
pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

// Network operation timeouts
/// DNS query timeout in seconds
/// MX lookups happen once per run, so 3s fails fast without being flaky
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// SMTP submission timeout in seconds
pub const SMTP_TIMEOUT_SECS: u64 = 30;

// Probe defaults
/// Default port probed when none is given
pub const DEFAULT_PORT: u16 = 443;
/// Alert when fewer than this many days remain before expiry
pub const DEFAULT_EXPIRY_THRESHOLD_DAYS: i64 = 20;
/// Largest accepted expiry threshold (days)
pub const MAX_EXPIRY_THRESHOLD_DAYS: i64 = 365;

// Transcript retention
/// Number of transcript files kept by default
pub const DEFAULT_LOG_RETENTION: u32 = 90;
/// Largest accepted retention count
pub const MAX_LOG_RETENTION: u32 = 365;
/// Timestamp suffix of transcript file names (sorts lexicographically by time)
pub const TRANSCRIPT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Transcript file extension
pub const TRANSCRIPT_EXTENSION: &str = "log";

// Alert delivery
/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Environment variable holding the SMTP password
pub const SMTP_PASSWORD_ENV: &str = "CERT_MONITOR_SMTP_PASSWORD";

// Event log
/// Fixed event id written for every event
pub const EVENT_ID: u32 = 1000;
/// Windows event log the source is registered under
pub const EVENT_LOG_NAME: &str = "Application";
