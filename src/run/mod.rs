//! Run orchestration.
//!
//! Builds the notifier, probes every endpoint, logs statistics and sends the
//! end-of-run error summary. Exit codes are derived from the [`RunOutcome`].

mod context;
mod notifier;

use std::path::PathBuf;

use crate::config::Config;
use crate::error_handling::{log_probe_statistics, InitializationError, ProbeStats};
use crate::notify::{Alert, Notifier, Severity};
use crate::probe::{probe_all, CertificateSource, ProbeResult};
use crate::tls::TlsProber;

pub use context::RunContext;
pub use notifier::build_notifier;

/// Exit code: every endpoint healthy and no errors.
pub const EXIT_OK: i32 = 0;
/// Exit code: expiring certificates, failed endpoints or run errors.
pub const EXIT_FINDINGS: i32 = 1;
/// Exit code: the run could not start.
pub const EXIT_FATAL: i32 = 2;

/// Result of one complete run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Whether any step marked the run as errored
    pub error_occurred: bool,
    /// Per-endpoint results in probe order
    pub results: Vec<ProbeResult>,
    /// Diagnostic lines in the order they were emitted
    pub diagnostics: Vec<String>,
    /// Transcript written for this run
    pub transcript_path: Option<PathBuf>,
}

impl RunOutcome {
    /// Tallies the results.
    pub fn stats(&self) -> ProbeStats {
        ProbeStats::from_results(&self.results)
    }

    /// Whether any endpoint was expiring or unreachable.
    pub fn has_findings(&self) -> bool {
        self.results.iter().any(ProbeResult::is_finding)
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        if self.error_occurred || self.has_findings() {
            EXIT_FINDINGS
        } else {
            EXIT_OK
        }
    }
}

/// Probes all endpoints with the given source and notifier.
///
/// When any step reported an error, a single summary alert pointing at the
/// transcript is sent after the loop and an error event is written.
pub async fn execute<S, N>(
    config: &Config,
    source: &S,
    notifier: &mut N,
    mut ctx: RunContext,
    transcript_path: Option<PathBuf>,
) -> RunOutcome
where
    S: CertificateSource,
    N: Notifier,
{
    let results = probe_all(config, source, notifier, &mut ctx).await;
    log_probe_statistics(&ProbeStats::from_results(&results));

    if ctx.error_occurred() {
        let alert = Alert::run_errors(transcript_path.as_deref());
        if let Err(e) = notifier.send_alert(&alert.subject, &alert.body).await {
            ctx.error(format!("Failed to send error summary: {e}"));
        }
        if let Err(e) = notifier.log_event(&alert.body, Severity::Error).await {
            ctx.error(format!("Failed to write error summary event: {e}"));
        }
    }

    ctx.into_outcome(results, transcript_path)
}

/// Runs a full certificate check against real endpoints.
///
/// # Errors
///
/// Returns `InitializationError::TlsConfigError` if the TLS client cannot be
/// configured. Everything after that is reported through the outcome.
pub async fn run_check(
    config: &Config,
    transcript_path: Option<PathBuf>,
) -> Result<RunOutcome, InitializationError> {
    let mut ctx = RunContext::new();
    let prober = TlsProber::new(config)?;
    let mut notifier = build_notifier(config, &mut ctx).await;
    Ok(execute(config, &prober, &mut notifier, ctx, transcript_path).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::FailureCategory;
    use crate::probe::Endpoint;
    use chrono::Utc;

    fn outcome(error_occurred: bool, results: Vec<ProbeResult>) -> RunOutcome {
        RunOutcome {
            error_occurred,
            results,
            diagnostics: Vec::new(),
            transcript_path: None,
        }
    }

    fn healthy() -> ProbeResult {
        ProbeResult::Healthy {
            endpoint: Endpoint::new("example.com", 443),
            issuer: "CN=Test CA".to_string(),
            expires: Utc::now(),
        }
    }

    #[test]
    fn test_exit_code_all_healthy() {
        assert_eq!(outcome(false, vec![healthy()]).exit_code(), EXIT_OK);
        assert_eq!(outcome(false, Vec::new()).exit_code(), EXIT_OK);
    }

    #[test]
    fn test_exit_code_with_failure() {
        let failure = ProbeResult::ConnectionFailure {
            endpoint: Endpoint::new("example.com", 25),
            category: FailureCategory::HandshakeFailure,
            raw_message: "corrupt message".to_string(),
        };
        assert_eq!(outcome(false, vec![healthy(), failure]).exit_code(), EXIT_FINDINGS);
    }

    #[test]
    fn test_exit_code_with_run_error() {
        assert_eq!(outcome(true, vec![healthy()]).exit_code(), EXIT_FINDINGS);
    }
}
