//! cert_expiry_monitor library: TLS certificate expiry checks
//!
//! Connects to every `host:port` combination, reads the leaf certificate
//! without validating it, and alerts by email and event log when a
//! certificate is inside the expiry threshold. Failed connections are
//! categorized (access denied, handshake failure, firewall blocked, unknown)
//! and reported without stopping the run.
//!
//! # Example
//!
//! ```no_run
//! use cert_expiry_monitor::{run_check, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! cert_expiry_monitor::initialization::init_crypto_provider();
//! let config = Config {
//!     hosts: vec!["example.com".to_string()],
//!     ports: vec![443, 8443],
//!     ..Default::default()
//! };
//!
//! let outcome = run_check(&config, None).await?;
//! println!("{} endpoint(s) checked, exit code {}",
//!          outcome.results.len(), outcome.exit_code());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

#![warn(missing_docs)]

pub mod config;
mod dns;
mod error_handling;
pub mod initialization;
pub mod notify;
pub mod probe;
pub mod run;
pub mod tls;
pub mod transcript;

// Re-export public API
pub use config::{Config, ConfigError, LogFormat, LogLevel, TlsCeiling};
pub use dns::{lookup_mx_records, resolve_smtp_servers, MxRecord};
pub use error_handling::{
    categorize_io_error, categorize_probe_error, categorize_tls_error, FailureCategory,
    InitializationError, NotifyError, ProbeError, ProbeStage, ProbeStats, TranscriptError,
};
pub use run::{execute, run_check, RunContext, RunOutcome, EXIT_FATAL, EXIT_FINDINGS, EXIT_OK};
