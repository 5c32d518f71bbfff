//! DNS lookups.
//!
//! Used to find the SMTP relay for the alert recipient's domain when no
//! server is configured explicitly. Queries go through `hickory-resolver`.

mod records;

pub use records::{lookup_mx_records, resolve_smtp_servers, MxRecord};
