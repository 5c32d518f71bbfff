//! Notifier construction.

use lettre::transport::smtp::authentication::Credentials;

use crate::config::{Config, PROGRAM_NAME, SMTP_PASSWORD_ENV};
use crate::dns::resolve_smtp_servers;
use crate::initialization::init_resolver;
use crate::notify::{EventLog, Mailer, SystemNotifier};

use super::RunContext;

/// Builds the production notifier for `config`.
///
/// Email is enabled only when a recipient is configured and an SMTP server is
/// known, either from `--smtp-server` or from the recipient domain's MX
/// records. A failed MX lookup disables email and marks the run as errored.
pub async fn build_notifier(config: &Config, ctx: &mut RunContext) -> SystemNotifier {
    let event_log = EventLog::new(PROGRAM_NAME);
    let mailer = build_mailer(config, ctx).await;
    SystemNotifier::new(mailer, event_log)
}

async fn build_mailer(config: &Config, ctx: &mut RunContext) -> Option<Mailer> {
    let Some(recipient) = config.mail_to.as_deref() else {
        log::info!("No recipient configured; email alerts are disabled");
        return None;
    };
    let Some(sender) = config.sender_address() else {
        ctx.error(format!("Cannot derive a sender address for recipient {recipient}"));
        return None;
    };

    let server = match config.smtp_servers.first() {
        Some(server) => server.clone(),
        None => {
            let domain = config.recipient_domain()?;
            let resolver = init_resolver();
            match resolve_smtp_servers(domain, &resolver).await {
                Ok(servers) => {
                    log::info!("SMTP servers for {domain}: {}", servers.join(", "));
                    servers.into_iter().next()?
                }
                Err(e) => {
                    ctx.error(format!(
                        "MX lookup for {domain} failed, email alerts are disabled: {e:#}"
                    ));
                    return None;
                }
            }
        }
    };

    match Mailer::new(&sender, recipient, server, config.smtp_port, credentials(config, ctx)) {
        Ok(mailer) => {
            log::info!(
                "Alerts go to {recipient} via {}:{}",
                mailer.server(),
                config.smtp_port
            );
            Some(mailer)
        }
        Err(e) => {
            ctx.error(format!("Email alerts are disabled: {e}"));
            None
        }
    }
}

fn credentials(config: &Config, ctx: &mut RunContext) -> Option<Credentials> {
    let username = config.smtp_username.clone()?;
    match std::env::var(SMTP_PASSWORD_ENV) {
        Ok(password) => Some(Credentials::new(username, password)),
        Err(_) => {
            ctx.warn(format!(
                "SMTP username given but {SMTP_PASSWORD_ENV} is not set; \
                 submitting without authentication"
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_recipient_disables_email() {
        let config = Config {
            hosts: vec!["example.com".to_string()],
            ..Default::default()
        };
        let mut ctx = RunContext::new();
        let notifier = build_notifier(&config, &mut ctx).await;
        assert!(!notifier.has_mailer());
        assert!(!ctx.error_occurred());
    }

    #[tokio::test]
    async fn test_explicit_server_skips_mx_lookup() {
        let config = Config {
            hosts: vec!["example.com".to_string()],
            mail_to: Some("ops@example.com".to_string()),
            smtp_servers: vec!["smtp.example.com".to_string()],
            ..Default::default()
        };
        let mut ctx = RunContext::new();
        let notifier = build_notifier(&config, &mut ctx).await;
        assert!(notifier.has_mailer());
        assert!(!ctx.error_occurred());
    }
}
