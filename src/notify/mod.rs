//! Alert delivery.
//!
//! Two sinks are exposed through the [`Notifier`] trait: email alerts and the
//! system event log. [`SystemNotifier`] is the production implementation.

mod alert;
mod email;
mod eventlog;

use std::fmt;

use log::warn;

use crate::error_handling::NotifyError;

pub use alert::Alert;
pub use email::Mailer;
pub use eventlog::EventLog;

/// Event log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational event
    Info,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("Information"),
            Severity::Warning => f.write_str("Warning"),
            Severity::Error => f.write_str("Error"),
        }
    }
}

/// Destination for alerts and events.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Sends an alert to the configured recipient.
    async fn send_alert(&mut self, subject: &str, body: &str) -> Result<(), NotifyError>;

    /// Writes an event with the fixed event id.
    async fn log_event(&mut self, message: &str, severity: Severity) -> Result<(), NotifyError>;
}

/// Email plus system event log.
///
/// Without a mailer, alerts are dropped with a debug line.
pub struct SystemNotifier {
    mailer: Option<Mailer>,
    event_log: EventLog,
}

impl SystemNotifier {
    /// Creates a notifier.
    pub fn new(mailer: Option<Mailer>, event_log: EventLog) -> Self {
        Self { mailer, event_log }
    }

    /// Whether email alerts are enabled.
    pub fn has_mailer(&self) -> bool {
        self.mailer.is_some()
    }
}

impl Notifier for SystemNotifier {
    async fn send_alert(&mut self, subject: &str, body: &str) -> Result<(), NotifyError> {
        match &self.mailer {
            Some(mailer) => mailer.send(subject, body).await,
            None => {
                log::debug!("Email alerts disabled, not sending {subject:?}");
                Ok(())
            }
        }
    }

    async fn log_event(&mut self, message: &str, severity: Severity) -> Result<(), NotifyError> {
        if let Err(e) = self.event_log.ensure_registered() {
            warn!("{e}; events will be written to the transcript only");
            let alert = Alert::event_log_unavailable(self.event_log.source_name(), &e.to_string());
            if let Err(send_err) = self.send_alert(&alert.subject, &alert.body).await {
                warn!("Failed to send event log registration alert: {send_err}");
            }
        }
        self.event_log.write(message, severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Info.to_string(), "Information");
        assert_eq!(Severity::Warning.to_string(), "Warning");
        assert_eq!(Severity::Error.to_string(), "Error");
    }

    #[tokio::test]
    async fn test_alert_without_mailer_is_noop() {
        let mut notifier = SystemNotifier::new(None, EventLog::new("cert_expiry_monitor"));
        assert!(!notifier.has_mailer());
        assert!(notifier.send_alert("subject", "body").await.is_ok());
    }

    #[tokio::test]
    async fn test_log_event_without_mailer() {
        let mut notifier = SystemNotifier::new(None, EventLog::new("cert_expiry_monitor"));
        assert!(notifier
            .log_event("example.com:443 expires soon", Severity::Warning)
            .await
            .is_ok());
    }
}
