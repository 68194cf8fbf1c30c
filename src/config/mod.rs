//! Configuration module
//!
//! Operator-facing configuration records for the TLS core: which backend
//! supplies the process identity, and which cipher-suite families may be
//! negotiated.

pub mod error;

pub use self::error::ConfigError;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::tls::cert::{CertificateError, ResolvedCertificate};
use crate::tls::policy::{self, TlsPolicy};
use crate::tls::source;

/// Default cipher-suite family selection.
pub const DEFAULT_CIPHER_SUITES: &str = "AES,CHACHA";

/// Certificate source parameters
///
/// Holds every backend's parameters side by side. Which backend is active
/// is decided by the resolver's precedence rules at resolution time, not
/// by a discriminant field here; see
/// [`select_certificate_source`](crate::tls::source::select_certificate_source).
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct CertificateSourceConfig {
    /// PKCS#12 keystore path
    pub keystore: Option<PathBuf>,

    /// PKCS#12 keystore password
    pub keystore_password: Option<String>,

    /// PEM certificate (chain) path
    pub cert: Option<PathBuf>,

    /// PEM private key path
    pub key: Option<PathBuf>,

    /// CA bundle path, handed to every backend unconditionally
    pub ca_bundle: Option<PathBuf>,

    /// PKCS#11 module path; configuring this selects the PKCS#11 backend
    pub pkcs11_module: Option<PathBuf>,

    /// PKCS#11 token label
    pub pkcs11_token_label: Option<String>,

    /// PKCS#11 token PIN
    pub pkcs11_pin: Option<String>,

    /// Certificate presented together with the PKCS#11 token-held key.
    /// When unset, the keystore path (then the cert path) is reused for
    /// backward compatibility; that fallback is deprecated.
    pub pkcs11_cert: Option<PathBuf>,

    /// Keychain identity name (certificate common name)
    pub keychain_identity: Option<String>,

    /// Keychain issuer name (CA common name)
    pub keychain_issuer: Option<String>,

    /// Require the keychain identity to be backed by a hardware token
    pub keychain_require_token: bool,
}

/// An empty path value counts as unset.
pub(crate) fn configured(path: &Option<PathBuf>) -> Option<&Path> {
    path.as_deref().filter(|p| !p.as_os_str().is_empty())
}

fn configured_str(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl CertificateSourceConfig {
    /// A PKCS#11 module path is configured.
    pub fn has_pkcs11(&self) -> bool {
        configured(&self.pkcs11_module).is_some()
    }

    /// A keychain identity or issuer is configured.
    pub fn has_keychain_identity(&self) -> bool {
        configured_str(&self.keychain_identity).is_some()
            || configured_str(&self.keychain_issuer).is_some()
    }

    /// A complete PEM cert/key pair is configured.
    pub fn has_pem_pair(&self) -> bool {
        configured(&self.cert).is_some() && configured(&self.key).is_some()
    }

    /// A keystore path is configured.
    pub fn has_keystore(&self) -> bool {
        configured(&self.keystore).is_some()
    }
}

// The keystore password and token PIN must never reach the logs.
impl fmt::Debug for CertificateSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateSourceConfig")
            .field("keystore", &self.keystore)
            .field(
                "keystore_password",
                &self.keystore_password.as_ref().map(|_| "<redacted>"),
            )
            .field("cert", &self.cert)
            .field("key", &self.key)
            .field("ca_bundle", &self.ca_bundle)
            .field("pkcs11_module", &self.pkcs11_module)
            .field("pkcs11_token_label", &self.pkcs11_token_label)
            .field("pkcs11_pin", &self.pkcs11_pin.as_ref().map(|_| "<redacted>"))
            .field("pkcs11_cert", &self.pkcs11_cert)
            .field("keychain_identity", &self.keychain_identity)
            .field("keychain_issuer", &self.keychain_issuer)
            .field("keychain_require_token", &self.keychain_require_token)
            .finish()
    }
}

/// TLS core configuration
///
/// The full operator surface consumed by this crate: the certificate
/// source record plus the negotiation-policy inputs. Supports loading
/// from a JSON configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(default)]
pub struct TlsConfig {
    /// Certificate source parameters
    pub certificate: CertificateSourceConfig,

    /// Comma-separated cipher-suite family selection
    pub cipher_suites: String,

    /// Allow unsafe-tier cipher-suite families to be selected
    pub allow_unsafe_cipher_suites: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            certificate: CertificateSourceConfig::default(),
            cipher_suites: DEFAULT_CIPHER_SUITES.to_string(),
            allow_unsafe_cipher_suites: false,
        }
    }
}

impl TlsConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the negotiation policy for the client role.
    pub fn client_policy(&self) -> Result<TlsPolicy, ConfigError> {
        policy::build_client_policy(&self.cipher_suites, self.allow_unsafe_cipher_suites)
    }

    /// Build the negotiation policy for the server role.
    pub fn server_policy(&self) -> Result<TlsPolicy, ConfigError> {
        policy::build_server_policy(&self.cipher_suites, self.allow_unsafe_cipher_suites)
    }

    /// Resolve the configured certificate source.
    pub fn resolve_certificate(&self) -> Result<ResolvedCertificate, CertificateError> {
        source::resolve_certificate(&self.certificate)
    }

    /// Log the effective configuration at debug level.
    pub fn log(&self) {
        debug!("=== TLS configuration ===");
        debug!("  Cipher suites: {}", self.cipher_suites);
        debug!(
            "  Allow unsafe cipher suites: {}",
            self.allow_unsafe_cipher_suites
        );
        debug!(
            "  Certificate source: {}",
            source::select_certificate_source(&self.certificate)
        );
        if let Some(path) = configured(&self.certificate.ca_bundle) {
            debug!("  CA bundle: {}", path.display());
        }
        debug!("=========================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TlsConfig::default();

        assert_eq!(config.cipher_suites, "AES,CHACHA");
        assert!(!config.allow_unsafe_cipher_suites);
        assert_eq!(config.certificate, CertificateSourceConfig::default());
    }

    #[test]
    fn test_parse_config() {
        let config: TlsConfig = serde_json::from_str(
            r#"{
                "cipher_suites": "AES",
                "allow_unsafe_cipher_suites": true,
                "certificate": {
                    "cert": "server.crt",
                    "key": "server.key",
                    "ca_bundle": "ca.crt"
                }
            }"#,
        )
        .expect("should parse configuration");

        assert_eq!(config.cipher_suites, "AES");
        assert!(config.allow_unsafe_cipher_suites);
        assert!(config.certificate.has_pem_pair());
        assert_eq!(
            config.certificate.ca_bundle.as_deref(),
            Some(Path::new("ca.crt"))
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<TlsConfig>(r#"{"cipher_suite": "AES"}"#);
        assert!(result.is_err(), "unknown fields should be rejected");
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let config = CertificateSourceConfig {
            keystore_password: Some("hunter2".to_string()),
            pkcs11_pin: Some("1234".to_string()),
            ..Default::default()
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("1234"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_empty_paths_count_as_unset() {
        let config = CertificateSourceConfig {
            pkcs11_module: Some(PathBuf::new()),
            cert: Some(PathBuf::from("server.crt")),
            key: Some(PathBuf::from("")),
            ..Default::default()
        };

        assert!(!config.has_pkcs11());
        assert!(!config.has_pem_pair());
    }
}
