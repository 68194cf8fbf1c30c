//! Certificate source resolution
//!
//! Inspects the configuration and selects exactly one credential backend.
//! The precedence order is fixed and evaluated top to bottom; the first
//! matching backend wins and the rest are never touched.

use std::fmt;
use std::path::Path;

use log::{info, warn};

use crate::config::{configured, CertificateSourceConfig};
use crate::tls::cert::{CertificateError, ResolvedCertificate};

/// The credential backend chosen for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertificateSourceKind {
    /// PKCS#11 hardware module
    Pkcs11,
    /// Operating system keychain
    Keychain,
    /// PEM cert/key file pair on disk
    PemFiles,
    /// Password-protected keystore file on disk
    Keystore,
    /// No source configured
    None,
}

impl fmt::Display for CertificateSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CertificateSourceKind::Pkcs11 => write!(f, "PKCS#11 module"),
            CertificateSourceKind::Keychain => write!(f, "operating system keychain"),
            CertificateSourceKind::PemFiles => write!(f, "cert/key files on disk"),
            CertificateSourceKind::Keystore => write!(f, "keystore file on disk"),
            CertificateSourceKind::None => write!(f, "no certificate source"),
        }
    }
}

/// Select the credential backend for `config`.
///
/// First match wins: PKCS#11 module, keychain identity, PEM pair,
/// keystore, none. A configuration matching no backend selects
/// [`CertificateSourceKind::None`], which is a valid outcome.
pub fn select_certificate_source(config: &CertificateSourceConfig) -> CertificateSourceKind {
    if config.has_pkcs11() {
        CertificateSourceKind::Pkcs11
    } else if config.has_keychain_identity() {
        CertificateSourceKind::Keychain
    } else if config.has_pem_pair() {
        CertificateSourceKind::PemFiles
    } else if config.has_keystore() {
        CertificateSourceKind::Keystore
    } else {
        CertificateSourceKind::None
    }
}

/// Resolve the configured certificate source to a certificate handle.
///
/// Exactly one backend loader is invoked, in the precedence order of
/// [`select_certificate_source`]; its failures are surfaced unmodified.
/// Every backend receives the CA bundle path. The selected source is
/// logged for operational diagnosis.
pub fn resolve_certificate(
    config: &CertificateSourceConfig,
) -> Result<ResolvedCertificate, CertificateError> {
    let ca_bundle = config.ca_bundle.clone();

    if let Some(module) = configured(&config.pkcs11_module) {
        info!("using PKCS#11 module as certificate source");
        let cert_path = pkcs11_certificate_path(config)?;
        return ResolvedCertificate::from_pkcs11_module(
            cert_path,
            ca_bundle,
            module,
            config.pkcs11_token_label.clone(),
            config.pkcs11_pin.clone(),
        );
    }

    if config.has_keychain_identity() {
        info!("using operating system keychain as certificate source");
        return ResolvedCertificate::from_keychain_identity(
            config.keychain_identity.clone(),
            config.keychain_issuer.clone(),
            ca_bundle,
            config.keychain_require_token,
        );
    }

    if let (Some(cert), Some(key)) = (configured(&config.cert), configured(&config.key)) {
        info!("using cert/key files on disk as certificate source");
        return ResolvedCertificate::from_pem_files(cert, key, ca_bundle);
    }

    if let Some(keystore) = configured(&config.keystore) {
        info!("using keystore file on disk as certificate source");
        let password = config.keystore_password.as_deref().unwrap_or("");
        return ResolvedCertificate::from_keystore(keystore, password, ca_bundle);
    }

    info!("no certificate source configured, running without certificate");
    Ok(ResolvedCertificate::none(ca_bundle))
}

/// Certificate path presented with the PKCS#11 token-held key.
///
/// Historically the keystore path (or, failing that, the cert path) was
/// reused for this. `pkcs11_cert` is the dedicated field; the old reuse
/// still works but warns.
fn pkcs11_certificate_path(
    config: &CertificateSourceConfig,
) -> Result<&Path, CertificateError> {
    if let Some(path) = configured(&config.pkcs11_cert) {
        return Ok(path);
    }
    if let Some(path) = configured(&config.keystore) {
        warn!("reusing the keystore path as the PKCS#11 certificate is deprecated, set pkcs11_cert instead");
        return Ok(path);
    }
    if let Some(path) = configured(&config.cert) {
        warn!("reusing the cert path as the PKCS#11 certificate is deprecated, set pkcs11_cert instead");
        return Ok(path);
    }
    Err(CertificateError::MissingPkcs11Certificate)
}
