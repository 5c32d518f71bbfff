//! Probe failure categorization.
//!
//! Maps the typed errors surfaced by the socket layer and rustls onto the four
//! actionable failure categories. Nothing here inspects message text.

use std::io;

use super::types::{FailureCategory, ProbeError};

/// Categorizes a `ProbeError` into a `FailureCategory`.
///
/// # Arguments
///
/// * `error` - The error raised while probing an endpoint
///
/// # Returns
///
/// The category reported for the endpoint.
pub fn categorize_probe_error(error: &ProbeError) -> FailureCategory {
    match error {
        ProbeError::Connect(e) | ProbeError::Handshake(e) => categorize_io_error(e),
        ProbeError::InvalidServerName { .. }
        | ProbeError::Timeout { .. }
        | ProbeError::NoPeerCertificate
        | ProbeError::CertificateParse(_) => FailureCategory::Unknown,
    }
}

/// Categorizes an I/O error from a TCP connect or TLS handshake.
///
/// tokio-rustls reports TLS failures as `InvalidData` errors wrapping a
/// `rustls::Error`; those are unwrapped and categorized by variant first.
pub fn categorize_io_error(error: &io::Error) -> FailureCategory {
    if let Some(tls_error) = error
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<rustls::Error>())
    {
        return categorize_tls_error(tls_error);
    }

    match error.kind() {
        io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionAborted
        | io::ErrorKind::BrokenPipe => FailureCategory::AccessDenied,
        io::ErrorKind::PermissionDenied => FailureCategory::FirewallBlocked,
        io::ErrorKind::InvalidData => FailureCategory::HandshakeFailure,
        _ => FailureCategory::Unknown,
    }
}

/// Categorizes a `rustls::Error` raised during the handshake.
///
/// Malformed records, out-of-sequence messages and protocol-level refusals
/// all mean the peer is not completing a TLS handshake with us.
pub fn categorize_tls_error(error: &rustls::Error) -> FailureCategory {
    match error {
        rustls::Error::InvalidMessage(_)
        | rustls::Error::InappropriateMessage { .. }
        | rustls::Error::InappropriateHandshakeMessage { .. }
        | rustls::Error::PeerIncompatible(_)
        | rustls::Error::PeerMisbehaved(_)
        | rustls::Error::AlertReceived(_)
        | rustls::Error::DecryptError => FailureCategory::HandshakeFailure,
        _ => FailureCategory::Unknown,
    }
}
