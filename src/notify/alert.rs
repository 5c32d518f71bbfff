//! Alert text.

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::PROGRAM_NAME;
use crate::probe::Endpoint;

/// Subject and plain-text body of an outgoing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Mail subject
    pub subject: String,
    /// Mail body, also used as the event log message
    pub body: String,
}

impl Alert {
    /// Alert for a certificate inside the expiry threshold.
    pub fn certificate_expiring(
        endpoint: &Endpoint,
        issuer: &str,
        expires: DateTime<Utc>,
        days_remaining: i64,
    ) -> Self {
        let subject = if days_remaining < 0 {
            format!("[{PROGRAM_NAME}] Certificate on {endpoint} has expired")
        } else {
            format!("[{PROGRAM_NAME}] Certificate on {endpoint} expires in {days_remaining} day(s)")
        };
        let body = format!(
            "The TLS certificate served by {endpoint} expires on {}.\n\
             Days remaining: {days_remaining}\n\
             Issuer: {issuer}\n",
            expires.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Self { subject, body }
    }

    /// Summary sent when any step of the run reported an error.
    pub fn run_errors(transcript_path: Option<&Path>) -> Self {
        let location = match transcript_path {
            Some(path) => format!("See the transcript at {} for details.", path.display()),
            None => "No transcript was written for this run.".to_string(),
        };
        Self {
            subject: format!("[{PROGRAM_NAME}] Errors occurred during the certificate check"),
            body: format!("One or more errors occurred while checking certificates.\n{location}\n"),
        }
    }

    /// Alert raised when the event log source cannot be registered.
    pub fn event_log_unavailable(source_name: &str, reason: &str) -> Self {
        Self {
            subject: format!("[{PROGRAM_NAME}] Event log source could not be registered"),
            body: format!(
                "The event source {source_name:?} could not be registered: {reason}\n\
                 Events from this run are written to the transcript only.\n"
            ),
        }
    }

    /// Alert raised when the run transcript cannot be created.
    pub fn transcript_failed(reason: &str) -> Self {
        Self {
            subject: format!("[{PROGRAM_NAME}] Could not start the run transcript"),
            body: format!("The certificate check was aborted before probing any endpoint: {reason}\n"),
        }
    }
}
