//! Configuration validation.
//!
//! `clap` already enforces numeric ranges on the command line. `Config::validate`
//! repeats those checks for configurations built programmatically and adds
//! the checks clap cannot express (host syntax, mail address syntax).

use std::str::FromStr;

use lettre::Address;
use thiserror::Error;

use super::constants::{MAX_EXPIRY_THRESHOLD_DAYS, MAX_LOG_RETENTION};
use super::types::Config;

/// Reasons a configuration is rejected before any endpoint is probed.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No host names were supplied.
    #[error("at least one host name is required")]
    NoHosts,

    /// No ports were supplied.
    #[error("at least one port is required")]
    NoPorts,

    /// A host name is empty or contains whitespace.
    #[error("invalid host name {0:?}: host names must be non-empty and contain no whitespace")]
    InvalidHost(String),

    /// The expiry threshold is outside 1..=365 days.
    #[error("expiry threshold must be between 1 and 365 days, got {0}")]
    ThresholdOutOfRange(i64),

    /// The transcript retention count is outside 1..=365.
    #[error("log retention must be between 1 and 365, got {0}")]
    RetentionOutOfRange(u32),

    /// A mail address failed syntax validation.
    #[error("invalid {field} address {value:?}: {reason}")]
    InvalidAddress {
        /// Which option carried the address (`from` or `to`)
        field: &'static str,
        /// The rejected value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A sender was given without a recipient.
    #[error("--from was given without --to; alerts need a recipient")]
    SenderWithoutRecipient,

    /// A timeout of zero seconds was configured.
    #[error("{0} timeout must be at least one second")]
    ZeroTimeout(&'static str),
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.is_empty() {
            return Err(ConfigError::NoHosts);
        }
        if self.ports.is_empty() {
            return Err(ConfigError::NoPorts);
        }
        if let Some(host) = self.hosts.iter().find(|host| !is_valid_host(host)) {
            return Err(ConfigError::InvalidHost(host.clone()));
        }
        if !(1..=MAX_EXPIRY_THRESHOLD_DAYS).contains(&self.expiry_threshold_days) {
            return Err(ConfigError::ThresholdOutOfRange(self.expiry_threshold_days));
        }
        if !(1..=MAX_LOG_RETENTION).contains(&self.log_retention) {
            return Err(ConfigError::RetentionOutOfRange(self.log_retention));
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("connect"));
        }
        if self.handshake_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout("handshake"));
        }

        if self.mail_from.is_some() && self.mail_to.is_none() {
            return Err(ConfigError::SenderWithoutRecipient);
        }
        if let Some(to) = &self.mail_to {
            validate_address("to", to)?;
        }
        if let Some(from) = &self.mail_from {
            validate_address("from", from)?;
        }

        Ok(())
    }
}

fn is_valid_host(host: &str) -> bool {
    !host.is_empty() && !host.chars().any(char::is_whitespace)
}

fn validate_address(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Address::from_str(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
