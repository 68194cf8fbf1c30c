//! Error handling module
//!
//! This module defines the error types and result type alias used in the crate.

use thiserror::Error;
use std::io;

use crate::common::fdlimit::LimitError;
use crate::config::error::ConfigError;
use crate::tls::cert::CertificateError;

/// TLS tunnel error type
///
/// Umbrella over the domain errors. Certificate and cipher-suite problems
/// are startup-fatal for the caller; a descriptor-limit failure is
/// advisory and its fatality is the caller's choice.
#[derive(Error, Debug)]
pub enum TunnelError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// OpenSSL error
    #[error("OpenSSL error: {0}")]
    Ssl(#[from] openssl::error::ErrorStack),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Certificate source error
    #[error("certificate error: {0}")]
    Certificate(#[from] CertificateError),

    /// File descriptor limit error
    #[error("resource limit error: {0}")]
    ResourceLimit(#[from] LimitError),
}

/// Result type alias
///
/// This is a `Result` type alias that uses our custom `TunnelError`.
pub type Result<T> = std::result::Result<T, TunnelError>;
