//! Error type definitions.
//!
//! This module defines the error enums used throughout the application and the
//! failure categories a probe can end in.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS client configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),
}

/// Errors creating or rotating the run transcript.
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The log directory could not be created.
    #[error("failed to create log directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The log directory could not be listed for retention pruning.
    #[error("failed to list log directory {path}: {source}")]
    ListDir {
        /// Directory that could not be listed
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The transcript file could not be opened.
    #[error("failed to open transcript {path}: {source}")]
    Open {
        /// Transcript path
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// Stage of a probe that timed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    /// TCP connect
    Connect,
    /// TLS handshake
    Handshake,
}

impl std::fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeStage::Connect => f.write_str("TCP connect"),
            ProbeStage::Handshake => f.write_str("TLS handshake"),
        }
    }
}

/// Errors raised while probing a single endpoint.
///
/// These never leave the probe loop; they are categorized with
/// [`categorize_probe_error`](super::categorize_probe_error) and reported.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The host is not a valid DNS name or IP address.
    #[error("invalid server name {host:?}: {reason}")]
    InvalidServerName {
        /// Host as configured
        host: String,
        /// Parser message
        reason: String,
    },

    /// TCP connection failed.
    #[error("connection failed: {0}")]
    Connect(#[source] io::Error),

    /// TLS handshake failed.
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),

    /// A stage did not complete within its timeout.
    #[error("{stage} timed out after {secs}s")]
    Timeout {
        /// Stage that timed out
        stage: ProbeStage,
        /// Configured timeout in seconds
        secs: u64,
    },

    /// The handshake completed but the peer sent no certificate.
    #[error("peer presented no certificate")]
    NoPeerCertificate,

    /// The peer certificate could not be parsed.
    #[error("failed to parse peer certificate: {0}")]
    CertificateParse(String),
}

/// Errors delivering an alert or writing an event.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// A mail address could not be parsed.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The email message could not be built.
    #[error("failed to build alert email: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP submission failed.
    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The blocking delivery task panicked or was cancelled.
    #[error("alert delivery task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The event log source could not be registered.
    #[error("event log source {source_name:?} could not be registered: {reason}")]
    EventSourceRegistration {
        /// Event source name
        source_name: String,
        /// Platform message
        reason: String,
    },

    /// Writing to the event log failed.
    #[error("event log write failed: {0}")]
    EventWrite(String),
}

/// Actionable category of a failed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureCategory {
    /// The peer reset or forcibly closed the connection
    AccessDenied,
    /// The peer did not speak TLS or sent a malformed handshake
    HandshakeFailure,
    /// A local firewall or socket permission blocked the connection
    FirewallBlocked,
    /// Anything else
    Unknown,
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureCategory {
    /// Short name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::AccessDenied => "Access denied",
            FailureCategory::HandshakeFailure => "Handshake failure",
            FailureCategory::FirewallBlocked => "Firewall blocked",
            FailureCategory::Unknown => "Unknown",
        }
    }

    /// Human-readable diagnostic line for a failed endpoint.
    pub fn diagnostic(&self, endpoint: &str, raw_message: &str) -> String {
        match self {
            FailureCategory::AccessDenied => format!(
                "{endpoint}: the connection was forcibly closed by the remote host; \
                 access is probably denied for this client"
            ),
            FailureCategory::HandshakeFailure => format!(
                "{endpoint}: the TLS handshake failed on a malformed or unexpected frame; \
                 the port is probably not serving TLS"
            ),
            FailureCategory::FirewallBlocked => format!(
                "{endpoint}: the connection was blocked by a local firewall or socket permission"
            ),
            FailureCategory::Unknown => {
                format!("{endpoint}: the certificate could not be read: {raw_message}")
            }
        }
    }
}
