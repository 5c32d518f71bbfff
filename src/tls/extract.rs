//! Certificate extraction utilities.

use chrono::{DateTime, Utc};
use x509_parser::time::ASN1Time;

use super::CertificateInfo;
use crate::error_handling::ProbeError;

/// Parses a DER-encoded leaf certificate into `CertificateInfo`.
///
/// # Arguments
///
/// * `der` - The DER bytes of the peer's end-entity certificate
///
/// # Errors
///
/// Returns `ProbeError::CertificateParse` if the DER is malformed or a
/// validity date is outside chrono's range.
pub(crate) fn parse_certificate(der: &[u8]) -> Result<CertificateInfo, ProbeError> {
    let (_, cert) = x509_parser::parse_x509_certificate(der)
        .map_err(|e| ProbeError::CertificateParse(e.to_string()))?;

    let validity = cert.validity();
    Ok(CertificateInfo {
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        serial: cert.raw_serial_as_string(),
        not_before: asn1_to_utc(&validity.not_before, "not_before")?,
        not_after: asn1_to_utc(&validity.not_after, "not_after")?,
        tls_version: None,
    })
}

fn asn1_to_utc(time: &ASN1Time, field: &str) -> Result<DateTime<Utc>, ProbeError> {
    DateTime::<Utc>::from_timestamp(time.timestamp(), 0).ok_or_else(|| {
        ProbeError::CertificateParse(format!("{field} is out of range: {}", time.timestamp()))
    })
}
