//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `cert_expiry_monitor` library that handles:
//! - Command-line argument parsing and validation
//! - Environment variable loading (.env file)
//! - Run transcript and logger initialization
//! - Exit codes and the closing summary line
//!
//! All core functionality is implemented in the library crate.

use clap::Parser;
use log::{error, info, warn};
use std::process;

use cert_expiry_monitor::config::PROGRAM_NAME;
use cert_expiry_monitor::initialization::{init_crypto_provider, init_logger_with};
use cert_expiry_monitor::notify::{Alert, Notifier};
use cert_expiry_monitor::run::build_notifier;
use cert_expiry_monitor::transcript::Transcript;
use cert_expiry_monitor::{run_check, Config, RunContext, EXIT_FATAL};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if it exists)
    // so SMTP credentials need not be exported manually.
    // Try the current directory first, then the executable's directory
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("{PROGRAM_NAME} error: {e}");
        process::exit(EXIT_FATAL);
    }

    // Initialize crypto provider before any TLS (probe or SMTP) connection
    init_crypto_provider();

    let transcript = Transcript::create(
        &config.resolved_log_dir(),
        PROGRAM_NAME,
        config.log_retention,
    );
    let log_file = transcript
        .as_ref()
        .ok()
        .and_then(|t| t.try_clone_file().ok());
    if let Err(e) = init_logger_with(
        config.log_level.clone().into(),
        config.log_format.clone(),
        log_file,
    ) {
        eprintln!("{PROGRAM_NAME} error: {e}");
        process::exit(EXIT_FATAL);
    }

    let transcript = match transcript {
        Ok(transcript) => transcript,
        Err(e) => {
            error!("Could not start the run transcript: {e}");
            let mut ctx = RunContext::new();
            let mut notifier = build_notifier(&config, &mut ctx).await;
            let alert = Alert::transcript_failed(&e.to_string());
            if let Err(send_err) = notifier.send_alert(&alert.subject, &alert.body).await {
                warn!("Failed to send transcript failure alert: {send_err}");
            }
            log::logger().flush();
            process::exit(EXIT_FATAL);
        }
    };

    for removed in transcript.pruned() {
        info!("Removed old transcript {}", removed.display());
    }
    for (path, e) in transcript.prune_failures() {
        warn!("Could not remove old transcript {}: {e}", path.display());
    }
    info!("Transcript: {}", transcript.path().display());

    let outcome = match run_check(&config, Some(transcript.path().to_path_buf())).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            log::logger().flush();
            process::exit(EXIT_FATAL);
        }
    };

    let stats = outcome.stats();
    println!(
        "Checked {} endpoint{} ({} healthy, {} expiring soon, {} failed) - see {}",
        stats.total,
        if stats.total == 1 { "" } else { "s" },
        stats.healthy,
        stats.expiring_soon,
        stats.total_failures(),
        transcript.path().display()
    );

    log::logger().flush();
    process::exit(outcome.exit_code());
}
