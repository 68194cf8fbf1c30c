//! Configuration errors
//!
//! This module defines error types for the configuration module.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Unknown cipher-suite family name
    #[error("invalid cipher suite '{0}' selected")]
    UnknownCipherSuite(String),

    /// Unsafe-tier family selected without the explicit opt-in flag
    #[error("cipher suite '{0}' is unsafe and requires allow_unsafe_cipher_suites")]
    UnsafeCipherSuite(String),

    /// Error reading a configuration file
    #[error("failed to read configuration file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing a configuration file
    #[error("failed to parse configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
