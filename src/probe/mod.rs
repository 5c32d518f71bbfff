//! Endpoint probing.
//!
//! Walks every `host:port` combination in order, reads each leaf certificate,
//! evaluates its expiry and raises alerts. A failing endpoint never stops the
//! loop: the error is categorized, reported, and the next endpoint is tried.

mod expiry;
mod types;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::error_handling::{categorize_probe_error, ProbeError};
use crate::notify::{Alert, Notifier, Severity};
use crate::run::RunContext;
use crate::tls::CertificateInfo;

pub use expiry::{days_until_expiry, is_expiring_soon};
pub use types::{endpoints, Endpoint, ProbeResult};

/// Anything that can hand back the leaf certificate of an endpoint.
///
/// Implemented by [`TlsProber`](crate::tls::TlsProber) for real connections
/// and by test doubles.
#[allow(async_fn_in_trait)]
pub trait CertificateSource {
    /// Connects to `endpoint` and returns its leaf certificate details.
    async fn fetch_certificate(&self, endpoint: &Endpoint) -> Result<CertificateInfo, ProbeError>;
}

/// Probes a single endpoint and classifies the outcome.
pub async fn probe_endpoint<S: CertificateSource>(
    source: &S,
    endpoint: &Endpoint,
    threshold_days: i64,
) -> ProbeResult {
    match source.fetch_certificate(endpoint).await {
        Ok(info) => {
            let days_remaining = days_until_expiry(info.not_after, Utc::now());
            if is_expiring_soon(days_remaining, threshold_days) {
                ProbeResult::ExpiringSoon {
                    endpoint: endpoint.clone(),
                    issuer: info.issuer,
                    expires: info.not_after,
                    days_remaining,
                }
            } else {
                ProbeResult::Healthy {
                    endpoint: endpoint.clone(),
                    issuer: info.issuer,
                    expires: info.not_after,
                }
            }
        }
        Err(e) => ProbeResult::ConnectionFailure {
            endpoint: endpoint.clone(),
            category: categorize_probe_error(&e),
            raw_message: e.to_string(),
        },
    }
}

/// Probes every endpoint of `config` sequentially, in host-major order.
///
/// Diagnostics go through `ctx`; expiring certificates are alerted through
/// `notifier`. Alert delivery problems mark the run as errored but do not
/// interrupt the loop.
pub async fn probe_all<S, N>(
    config: &Config,
    source: &S,
    notifier: &mut N,
    ctx: &mut RunContext,
) -> Vec<ProbeResult>
where
    S: CertificateSource,
    N: Notifier,
{
    let targets = endpoints(&config.hosts, &config.ports);
    ctx.info(format!(
        "Checking {} endpoint(s) with an expiry threshold of {} days",
        targets.len(),
        config.expiry_threshold_days
    ));

    let mut results = Vec::with_capacity(targets.len());
    for endpoint in &targets {
        let result = probe_endpoint(source, endpoint, config.expiry_threshold_days).await;
        report_result(&result, config.expiry_threshold_days, notifier, ctx).await;
        results.push(result);
    }
    results
}

async fn report_result<N: Notifier>(
    result: &ProbeResult,
    threshold_days: i64,
    notifier: &mut N,
    ctx: &mut RunContext,
) {
    match result {
        ProbeResult::Healthy {
            endpoint,
            issuer,
            expires,
        } => log_certificate(ctx, endpoint, issuer, expires),
        ProbeResult::ExpiringSoon {
            endpoint,
            issuer,
            expires,
            days_remaining,
        } => {
            log_certificate(ctx, endpoint, issuer, expires);
            ctx.warn(format!(
                "{endpoint}: certificate expires in {days_remaining} day(s), \
                 below the {threshold_days} day threshold"
            ));

            let alert = Alert::certificate_expiring(endpoint, issuer, *expires, *days_remaining);
            if let Err(e) = notifier.send_alert(&alert.subject, &alert.body).await {
                ctx.error(format!("{endpoint}: failed to send expiry alert: {e}"));
            }
            if let Err(e) = notifier.log_event(&alert.body, Severity::Warning).await {
                ctx.error(format!("{endpoint}: failed to write expiry event: {e}"));
            }
        }
        ProbeResult::ConnectionFailure {
            endpoint,
            category,
            raw_message,
        } => {
            log::debug!("{endpoint}: probe failed ({category}): {raw_message}");
            ctx.info(category.diagnostic(&endpoint.to_string(), raw_message));
        }
    }
}

fn log_certificate(
    ctx: &mut RunContext,
    endpoint: &Endpoint,
    issuer: &str,
    expires: &DateTime<Utc>,
) {
    ctx.info(format!("{endpoint}: issued by {issuer}"));
    ctx.info(format!(
        "{endpoint}: today is {}, certificate expires {}",
        Utc::now().format("%Y-%m-%d"),
        expires.format("%Y-%m-%d %H:%M:%S UTC")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::{FailureCategory, NotifyError};
    use chrono::{DateTime, Duration};
    use std::collections::HashMap;
    use std::io;

    struct FakeSource {
        certificates: HashMap<String, DateTime<Utc>>,
    }

    impl CertificateSource for FakeSource {
        async fn fetch_certificate(
            &self,
            endpoint: &Endpoint,
        ) -> Result<CertificateInfo, ProbeError> {
            let key = endpoint.to_string();
            match self.certificates.get(&key) {
                Some(not_after) => Ok(CertificateInfo {
                    subject: format!("CN={}", endpoint.host),
                    issuer: "CN=Test CA".to_string(),
                    serial: "01".to_string(),
                    not_before: *not_after - Duration::days(90),
                    not_after: *not_after,
                    tls_version: None,
                }),
                None => Err(ProbeError::Handshake(io::Error::from(
                    io::ErrorKind::ConnectionReset,
                ))),
            }
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Vec<String>,
        events: Vec<(String, Severity)>,
        fail_alerts: bool,
    }

    impl Notifier for RecordingNotifier {
        async fn send_alert(&mut self, subject: &str, _body: &str) -> Result<(), NotifyError> {
            if self.fail_alerts {
                return Err(NotifyError::EventWrite("mail down".to_string()));
            }
            self.alerts.push(subject.to_string());
            Ok(())
        }

        async fn log_event(&mut self, message: &str, severity: Severity) -> Result<(), NotifyError> {
            self.events.push((message.to_string(), severity));
            Ok(())
        }
    }

    fn config(hosts: &[&str], ports: &[u16]) -> Config {
        Config {
            hosts: hosts.iter().map(|h| h.to_string()).collect(),
            ports: ports.to_vec(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_probe_endpoint_classifies_expiry() {
        let source = FakeSource {
            certificates: HashMap::from([
                ("soon:443".to_string(), Utc::now() + Duration::days(15) + Duration::hours(12)),
                ("later:443".to_string(), Utc::now() + Duration::days(200)),
            ]),
        };

        let soon = probe_endpoint(&source, &Endpoint::new("soon", 443), 20).await;
        assert!(matches!(
            soon,
            ProbeResult::ExpiringSoon { days_remaining: 15, .. }
        ));

        let later = probe_endpoint(&source, &Endpoint::new("later", 443), 20).await;
        assert!(matches!(later, ProbeResult::Healthy { .. }));
    }

    #[tokio::test]
    async fn test_probe_endpoint_categorizes_failure() {
        let source = FakeSource {
            certificates: HashMap::new(),
        };
        let result = probe_endpoint(&source, &Endpoint::new("gone", 443), 20).await;
        assert!(matches!(
            result,
            ProbeResult::ConnectionFailure {
                category: FailureCategory::AccessDenied,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_probe_all_continues_after_failures() {
        let source = FakeSource {
            certificates: HashMap::from([
                ("a:443".to_string(), Utc::now() + Duration::days(100)),
                ("b:8443".to_string(), Utc::now() + Duration::days(5)),
            ]),
        };
        let mut notifier = RecordingNotifier::default();
        let mut ctx = RunContext::new();

        let results = probe_all(&config(&["a", "b"], &[443, 8443]), &source, &mut notifier, &mut ctx).await;

        let order: Vec<String> = results.iter().map(|r| r.endpoint().to_string()).collect();
        assert_eq!(order, vec!["a:443", "a:8443", "b:443", "b:8443"]);
        assert!(matches!(results[0], ProbeResult::Healthy { .. }));
        assert!(matches!(results[1], ProbeResult::ConnectionFailure { .. }));
        assert!(matches!(results[2], ProbeResult::ConnectionFailure { .. }));
        assert!(matches!(results[3], ProbeResult::ExpiringSoon { .. }));

        assert_eq!(notifier.alerts.len(), 1);
        assert_eq!(notifier.events.len(), 1);
        assert_eq!(notifier.events[0].1, Severity::Warning);
        assert!(!ctx.error_occurred());
    }

    #[tokio::test]
    async fn test_alert_failure_marks_run_errored() {
        let source = FakeSource {
            certificates: HashMap::from([("a:443".to_string(), Utc::now() + Duration::days(1))]),
        };
        let mut notifier = RecordingNotifier {
            fail_alerts: true,
            ..Default::default()
        };
        let mut ctx = RunContext::new();

        let results = probe_all(&config(&["a"], &[443]), &source, &mut notifier, &mut ctx).await;

        assert_eq!(results.len(), 1);
        assert!(ctx.error_occurred());
        // the event is still written when email fails
        assert_eq!(notifier.events.len(), 1);
    }

    #[tokio::test]
    async fn test_failure_diagnostic_is_recorded() {
        let source = FakeSource {
            certificates: HashMap::new(),
        };
        let mut notifier = RecordingNotifier::default();
        let mut ctx = RunContext::new();

        probe_all(&config(&["x"], &[25]), &source, &mut notifier, &mut ctx).await;

        let expected = FailureCategory::AccessDenied.diagnostic("x:25", "");
        assert!(ctx.diagnostics().iter().any(|line| *line == expected));
        assert!(notifier.alerts.is_empty());
    }

    #[tokio::test]
    async fn test_certificate_lines_logged_once_per_endpoint() {
        let source = FakeSource {
            certificates: HashMap::from([
                ("ok:443".to_string(), Utc::now() + Duration::days(100)),
                ("soon:443".to_string(), Utc::now() + Duration::days(3)),
            ]),
        };
        let mut notifier = RecordingNotifier::default();
        let mut ctx = RunContext::new();

        probe_all(&config(&["ok", "soon"], &[443]), &source, &mut notifier, &mut ctx).await;

        for host in ["ok", "soon"] {
            let issued = format!("{host}:443: issued by CN=Test CA");
            let expires = format!("{host}:443: today is ");
            let lines = ctx.diagnostics();
            assert_eq!(lines.iter().filter(|l| **l == issued).count(), 1);
            assert_eq!(lines.iter().filter(|l| l.starts_with(&expires)).count(), 1);
        }
        let warnings = ctx
            .diagnostics()
            .iter()
            .filter(|l| l.contains("below the 20 day threshold"))
            .count();
        assert_eq!(warnings, 1);
    }
}
