//! Error handling and run statistics.
//!
//! This module provides:
//! - Error type definitions (initialization, transcript, probe, notification)
//! - Failure categorization of probe errors
//! - Run statistics built from probe results
//!
//! Probe failures are categorized into:
//! - **AccessDenied**: the peer reset or forcibly closed the connection
//! - **HandshakeFailure**: the peer did not complete a TLS handshake
//! - **FirewallBlocked**: a local firewall or socket permission blocked us
//! - **Unknown**: everything else

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{categorize_io_error, categorize_probe_error, categorize_tls_error};
pub use stats::{log_probe_statistics, ProbeStats};
pub use types::{
    FailureCategory, InitializationError, NotifyError, ProbeError, ProbeStage, TranscriptError,
};
