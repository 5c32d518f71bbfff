//! Probe data model.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error_handling::FailureCategory;

/// A `host:port` pair to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Expands host and port lists into probe targets.
///
/// Hosts are the outer loop and ports the inner loop; input order and
/// duplicates are preserved.
pub fn endpoints(hosts: &[String], ports: &[u16]) -> Vec<Endpoint> {
    hosts
        .iter()
        .flat_map(|host| ports.iter().map(move |port| Endpoint::new(host.clone(), *port)))
        .collect()
}

/// Outcome of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    /// The certificate is valid for at least the threshold.
    Healthy {
        /// Probed endpoint
        endpoint: Endpoint,
        /// Certificate issuer
        issuer: String,
        /// Certificate expiry
        expires: DateTime<Utc>,
    },
    /// Fewer days than the threshold remain (or the certificate has expired).
    ExpiringSoon {
        /// Probed endpoint
        endpoint: Endpoint,
        /// Certificate issuer
        issuer: String,
        /// Certificate expiry
        expires: DateTime<Utc>,
        /// Whole days until expiry; negative once expired
        days_remaining: i64,
    },
    /// The certificate could not be read.
    ConnectionFailure {
        /// Probed endpoint
        endpoint: Endpoint,
        /// Failure category
        category: FailureCategory,
        /// Error text from the socket or TLS layer
        raw_message: String,
    },
}

impl ProbeResult {
    /// Endpoint this result belongs to.
    pub fn endpoint(&self) -> &Endpoint {
        match self {
            ProbeResult::Healthy { endpoint, .. }
            | ProbeResult::ExpiringSoon { endpoint, .. }
            | ProbeResult::ConnectionFailure { endpoint, .. } => endpoint,
        }
    }

    /// Whether this result needs attention.
    pub fn is_finding(&self) -> bool {
        !matches!(self, ProbeResult::Healthy { .. })
    }
}
