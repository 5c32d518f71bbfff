//! SMTP delivery using lettre.

use std::time::Duration;

use lettre::message::{header, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use log::debug;

use crate::config::SMTP_TIMEOUT_SECS;
use crate::error_handling::NotifyError;

/// Sends plain-text alerts to one recipient through one SMTP relay.
///
/// The relay is reached with STARTTLS on the configured port.
#[derive(Clone)]
pub struct Mailer {
    from: Mailbox,
    to: Mailbox,
    server: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl Mailer {
    /// Creates a mailer.
    ///
    /// # Errors
    ///
    /// Returns `NotifyError::Address` if either address is malformed.
    pub fn new(
        from: &str,
        to: &str,
        server: impl Into<String>,
        port: u16,
        credentials: Option<Credentials>,
    ) -> Result<Self, NotifyError> {
        Ok(Self {
            from: from.parse()?,
            to: to.parse()?,
            server: server.into(),
            port,
            credentials,
        })
    }

    /// SMTP server this mailer submits to.
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Builds the alert message.
    pub fn build_message(&self, subject: &str, body: &str) -> Result<Message, NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_string())?;
        Ok(message)
    }

    fn transport(&self) -> Result<SmtpTransport, NotifyError> {
        let mut builder = SmtpTransport::starttls_relay(&self.server)?
            .port(self.port)
            .timeout(Some(Duration::from_secs(SMTP_TIMEOUT_SECS)));
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }
        Ok(builder.build())
    }

    /// Submits one alert.
    ///
    /// lettre's SMTP transport is blocking, so delivery runs on the blocking pool.
    pub async fn send(&self, subject: &str, body: &str) -> Result<(), NotifyError> {
        let message = self.build_message(subject, body)?;
        let transport = self.transport()?;

        debug!("Submitting alert {subject:?} via {}:{}", self.server, self.port);
        tokio::task::spawn_blocking(move || transport.send(&message)).await??;
        Ok(())
    }
}
