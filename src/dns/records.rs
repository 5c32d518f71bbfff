//! Mail exchanger (MX) queries.

use anyhow::{Error, Result};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::TokioAsyncResolver;

/// One MX record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    /// Lower is preferred
    pub preference: u16,
    /// Exchange host name without the trailing dot
    pub exchange: String,
}

/// Queries MX (mail exchanger) records for a domain.
///
/// # Arguments
///
/// * `domain` - The domain to query
/// * `resolver` - The DNS resolver instance
///
/// # Returns
///
/// The records in answer order, or an empty vector if the domain has none.
///
/// # Errors
///
/// Timeouts and other resolver failures are returned as errors.
pub async fn lookup_mx_records(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<MxRecord>, Error> {
    match resolver.lookup(domain, RecordType::MX).await {
        Ok(lookup) => {
            let records = lookup
                .iter()
                .filter_map(|rdata| {
                    if let RData::MX(mx) = rdata {
                        Some(MxRecord {
                            preference: mx.preference(),
                            exchange: normalize_exchange(&mx.exchange().to_utf8()),
                        })
                    } else {
                        None
                    }
                })
                .collect();
            Ok(records)
        }
        Err(e) => {
            if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) {
                Ok(Vec::new())
            } else {
                log::warn!("Failed to lookup MX records for {domain}: {e}");
                Err(e.into())
            }
        }
    }
}

/// Returns the SMTP relays for `domain`, most preferred first.
///
/// # Errors
///
/// Fails if the lookup fails or the domain publishes no usable MX record.
pub async fn resolve_smtp_servers(
    domain: &str,
    resolver: &TokioAsyncResolver,
) -> Result<Vec<String>, Error> {
    let records = lookup_mx_records(domain, resolver).await?;
    let servers = order_exchanges(records);
    if servers.is_empty() {
        anyhow::bail!("no MX records found for {domain}");
    }
    Ok(servers)
}

fn normalize_exchange(name: &str) -> String {
    name.trim_end_matches('.').to_ascii_lowercase()
}

/// Sorts by preference, drops null MX entries (RFC 7505) and duplicates.
fn order_exchanges(mut records: Vec<MxRecord>) -> Vec<String> {
    records.sort_by_key(|record| record.preference);
    let mut servers: Vec<String> = Vec::with_capacity(records.len());
    for record in records {
        if record.exchange.is_empty() || servers.contains(&record.exchange) {
            continue;
        }
        servers.push(record.exchange);
    }
    servers
}
