//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, event log identity, file naming)
//! - CLI option types and parsing
//! - Validation of a parsed configuration

mod constants;
mod types;
mod validation;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel, TlsCeiling};
pub use validation::ConfigError;
