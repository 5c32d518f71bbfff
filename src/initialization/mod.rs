//! Process-wide initialization: crypto provider, logger and DNS resolver.

mod logger;
mod resolver;

use rustls::crypto::{ring::default_provider, CryptoProvider};

pub use logger::init_logger_with;
pub use resolver::init_resolver;

/// Initializes the crypto provider for TLS operations.
///
/// Installs the `ring` provider as the process default for `rustls` (lettre's
/// STARTTLS connections pick it up from here). Must be called before any TLS
/// connection is made.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
