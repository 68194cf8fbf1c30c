//! TLS Tunnel: certificate source resolution and TLS policy construction
//!
//! This library implements the TLS core of a TLS-terminating tunnel. It
//! decides which backend supplies the process's cryptographic identity
//! (PKCS#11 module, OS keychain, PEM file pair, password-protected
//! keystore, or none at all) and assembles the negotiation policy used
//! when the tunnel acts as a TLS server or client. It also wraps the
//! file-descriptor-limit syscalls a connection-multiplexing proxy needs
//! during resource setup.
//!
//! The listener/dialer loop, certificate hot reload, and CLI surface are
//! external collaborators: they consume the [`ResolvedCertificate`] and
//! [`TlsPolicy`] values produced here.
//!
//! # Example
//!
//! ```
//! use tls_tunnel::config::TlsConfig;
//! use tls_tunnel::{build_server_policy, resolve_certificate};
//!
//! # fn main() -> tls_tunnel::Result<()> {
//! let config = TlsConfig::default();
//!
//! let policy = build_server_policy(&config.cipher_suites, config.allow_unsafe_cipher_suites)?;
//! assert!(!policy.cipher_suites.is_empty());
//!
//! // No certificate source configured: the tunnel runs without an identity.
//! let cert = resolve_certificate(&config.certificate)?;
//! assert!(!cert.has_identity());
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod common;
pub mod config;
pub mod tls;

// Re-export commonly used structures and functions for convenience
pub use common::{init_logger, Result, TunnelError};
pub use config::{CertificateSourceConfig, TlsConfig};
pub use tls::{
    build_client_policy, build_server_policy, resolve_certificate, ResolvedCertificate, TlsPolicy,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
