//! TLS certificate retrieval.
//!
//! This module connects to `host:port` endpoints and extracts the peer's leaf
//! certificate details:
//! - Certificate subject and issuer
//! - Validity period (not before/after dates)
//! - Serial number
//! - Negotiated TLS version
//!
//! Uses `tokio-rustls` for async TLS connections and `x509-parser` for certificate parsing.
//! Certificate validation is off by default so that expired and self-signed
//! certificates can still be read; see [`verifier`].

mod extract;
mod verifier;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::debug;
use rustls::crypto::ring::default_provider;
use rustls::pki_types::ServerName;
use rustls::SupportedProtocolVersion;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{Config, TlsCeiling};
use crate::error_handling::{InitializationError, ProbeError, ProbeStage};
use crate::probe::{CertificateSource, Endpoint};

pub(crate) use extract::parse_certificate;
use verifier::AcceptAnyServerCert;

static TLS12_ONLY: &[&SupportedProtocolVersion] = &[&rustls::version::TLS12];
static TLS12_AND_13: &[&SupportedProtocolVersion] =
    &[&rustls::version::TLS12, &rustls::version::TLS13];

/// Details read from a peer's leaf certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Subject distinguished name
    pub subject: String,
    /// Issuer distinguished name
    pub issuer: String,
    /// Serial number as colon-separated hex
    pub serial: String,
    /// Start of validity
    pub not_before: DateTime<Utc>,
    /// End of validity (expiry)
    pub not_after: DateTime<Utc>,
    /// Negotiated protocol version, when known
    pub tls_version: Option<String>,
}

/// Builds the rustls client configuration used by the probe.
///
/// The protocol floor is TLS 1.2 (rustls has no TLS 1.0/1.1); the ceiling is
/// `ceiling`. With `ignore_validation` the configuration accepts any server
/// certificate; otherwise it trusts the webpki root set.
///
/// # Errors
///
/// Returns a `rustls::Error` if the provider does not support the requested
/// protocol versions.
pub fn build_client_config(
    ignore_validation: bool,
    ceiling: TlsCeiling,
) -> Result<ClientConfig, rustls::Error> {
    let provider = Arc::new(default_provider());
    let versions = match ceiling {
        TlsCeiling::Tls12 => TLS12_ONLY,
        TlsCeiling::Tls13 => TLS12_AND_13,
    };

    let builder =
        ClientConfig::builder_with_provider(Arc::clone(&provider)).with_protocol_versions(versions)?;

    let config = if ignore_validation {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyServerCert::new(provider)))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        builder
            .with_root_certificates(root_store)
            .with_no_client_auth()
    };

    Ok(config)
}

/// Reads peer certificates over real TCP/TLS connections.
///
/// Each call opens its own connection and drops it before returning, so no
/// state is shared between endpoints.
#[derive(Clone)]
pub struct TlsProber {
    connector: TlsConnector,
    connect_timeout: Duration,
    handshake_timeout: Duration,
}

impl TlsProber {
    /// Creates a prober from the run configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::TlsConfigError` if the TLS client
    /// configuration cannot be built.
    pub fn new(config: &Config) -> Result<Self, InitializationError> {
        let client_config =
            build_client_config(config.ignore_validation_issues, config.max_tls_version)?;
        Ok(Self {
            connector: TlsConnector::from(Arc::new(client_config)),
            connect_timeout: config.connect_timeout(),
            handshake_timeout: config.handshake_timeout(),
        })
    }
}

impl CertificateSource for TlsProber {
    async fn fetch_certificate(&self, endpoint: &Endpoint) -> Result<CertificateInfo, ProbeError> {
        debug!("Attempting to resolve server name for {endpoint}");
        let server_name = ServerName::try_from(endpoint.host.clone()).map_err(|e| {
            ProbeError::InvalidServerName {
                host: endpoint.host.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!("Attempting to connect to {endpoint}");
        let sock = match tokio::time::timeout(
            self.connect_timeout,
            TcpStream::connect((endpoint.host.as_str(), endpoint.port)),
        )
        .await
        {
            Ok(Ok(sock)) => sock,
            Ok(Err(e)) => return Err(ProbeError::Connect(e)),
            Err(_) => {
                return Err(ProbeError::Timeout {
                    stage: ProbeStage::Connect,
                    secs: self.connect_timeout.as_secs(),
                })
            }
        };

        let mut tls_stream = match tokio::time::timeout(
            self.handshake_timeout,
            self.connector.connect(server_name, sock),
        )
        .await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(ProbeError::Handshake(e)),
            Err(_) => {
                return Err(ProbeError::Timeout {
                    stage: ProbeStage::Handshake,
                    secs: self.handshake_timeout.as_secs(),
                })
            }
        };

        let certificate = {
            let (_, session) = tls_stream.get_ref();
            let tls_version = session.protocol_version().map(|v| format!("{v:?}"));
            let leaf = session
                .peer_certificates()
                .and_then(|certs| certs.first())
                .ok_or(ProbeError::NoPeerCertificate)?;
            let mut info = parse_certificate(leaf.as_ref())?;
            info.tls_version = tls_version;
            info
        };

        // close_notify; the peer's reaction does not matter
        if tokio::time::timeout(self.handshake_timeout, tls_stream.shutdown())
            .await
            .is_err()
        {
            debug!("Timed out closing TLS session with {endpoint}");
        }

        Ok(certificate)
    }
}
