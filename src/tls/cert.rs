//! Certificate backend loaders
//!
//! Each loader turns one credential backend's parameters into a
//! [`ResolvedCertificate`]. The resolver in [`crate::tls::source`]
//! decides which loader runs; load failures are backend-specific and
//! surfaced to the caller unmodified.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use openssl::hash::MessageDigest;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::x509::{X509NameRef, X509};
use thiserror::Error;

/// Certificate backend failure
#[derive(Error, Debug)]
pub enum CertificateError {
    /// A backend input file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed certificate or key material, or a rejected keystore password
    #[error("invalid certificate or key material: {0}")]
    Parse(#[from] openssl::error::ErrorStack),

    /// A PEM file contained no certificate
    #[error("no certificate found in {}", .0.display())]
    EmptyChain(PathBuf),

    /// A keystore was missing its certificate or private key
    #[error("keystore {} does not contain a certificate and private key", .0.display())]
    IncompleteKeystore(PathBuf),

    /// The configured PKCS#11 module does not exist
    #[error("PKCS#11 module not found: {}", .0.display())]
    ModuleNotFound(PathBuf),

    /// The PKCS#11 backend was selected without a certificate path
    #[error("no certificate path configured for the PKCS#11 identity")]
    MissingPkcs11Certificate,

    /// The keychain backend was selected on an unsupported platform
    #[error("keychain identities are only supported on macOS")]
    KeychainUnsupported,
}

/// Certificate chain and private key loaded from disk.
#[derive(Clone)]
pub struct LocalIdentity {
    /// Leaf certificate
    pub cert: X509,
    /// Remaining chain certificates, in file order
    pub chain: Vec<X509>,
    /// Private key for the leaf
    pub key: PKey<Private>,
}

impl fmt::Debug for LocalIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalIdentity")
            .field("subject", &format_name(self.cert.subject_name()))
            .field("chain_len", &self.chain.len())
            .finish()
    }
}

/// Certificate on disk whose private key is held by a PKCS#11 token.
///
/// Key operations stay on the token; this handle carries everything the
/// TLS engine needs to reach it.
#[derive(Clone)]
pub struct Pkcs11Identity {
    /// PKCS#11 module path
    pub module: PathBuf,
    /// Token label, if the module exposes several tokens
    pub token_label: Option<String>,
    /// Token PIN
    pub pin: Option<String>,
    /// Leaf certificate
    pub cert: X509,
    /// Remaining chain certificates, in file order
    pub chain: Vec<X509>,
}

impl fmt::Debug for Pkcs11Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pkcs11Identity")
            .field("module", &self.module)
            .field("token_label", &self.token_label)
            .field("pin", &self.pin.as_ref().map(|_| "<redacted>"))
            .field("subject", &format_name(self.cert.subject_name()))
            .finish()
    }
}

/// Identity resident in the operating system keychain.
#[derive(Debug, Clone)]
pub struct KeychainIdentity {
    /// Identity name (certificate common name)
    pub identity: Option<String>,
    /// Issuer name (CA common name)
    pub issuer: Option<String>,
    /// Require the identity to be backed by a hardware token
    pub require_token: bool,
}

/// Certificate identity material, by backend.
#[derive(Debug, Clone)]
pub enum CertificateIdentity {
    /// Certificate chain and private key loaded from disk
    Local(LocalIdentity),
    /// Certificate on disk, private key held by a PKCS#11 token
    Pkcs11(Pkcs11Identity),
    /// Identity resident in the operating system keychain
    Keychain(KeychainIdentity),
    /// No identity; the process runs without presenting a certificate
    None,
}

/// Certificate handle produced by exactly one backend loader
///
/// Carries the CA bundle path regardless of which backend was chosen.
/// May hold the distinguished no-certificate value, which is a valid
/// outcome rather than a failure: a client with no mutual-auth
/// requirement runs without a presented identity.
#[derive(Debug, Clone)]
pub struct ResolvedCertificate {
    identity: CertificateIdentity,
    ca_bundle: Option<PathBuf>,
}

impl ResolvedCertificate {
    /// Load a certificate chain and private key from PEM files on disk.
    pub fn from_pem_files(
        cert_path: &Path,
        key_path: &Path,
        ca_bundle: Option<PathBuf>,
    ) -> Result<Self, CertificateError> {
        let (cert, chain) = read_pem_chain(cert_path)?;
        let key_pem = read_file(key_path)?;
        let key = PKey::private_key_from_pem(&key_pem)?;

        Ok(Self {
            identity: CertificateIdentity::Local(LocalIdentity { cert, chain, key }),
            ca_bundle,
        })
    }

    /// Load an identity from a password-protected PKCS#12 keystore.
    ///
    /// A wrong password surfaces as the backend's own parse failure.
    pub fn from_keystore(
        path: &Path,
        password: &str,
        ca_bundle: Option<PathBuf>,
    ) -> Result<Self, CertificateError> {
        let der = read_file(path)?;
        let parsed = Pkcs12::from_der(&der)?.parse2(password)?;

        let chain: Vec<X509> = parsed
            .ca
            .map(|stack| stack.into_iter().collect())
            .unwrap_or_default();
        let (Some(cert), Some(key)) = (parsed.cert, parsed.pkey) else {
            return Err(CertificateError::IncompleteKeystore(path.to_path_buf()));
        };

        Ok(Self {
            identity: CertificateIdentity::Local(LocalIdentity { cert, chain, key }),
            ca_bundle,
        })
    }

    /// Pair an on-disk certificate with a private key held by a PKCS#11
    /// module. Key operations are deferred to the token.
    pub fn from_pkcs11_module(
        cert_path: &Path,
        ca_bundle: Option<PathBuf>,
        module: &Path,
        token_label: Option<String>,
        pin: Option<String>,
    ) -> Result<Self, CertificateError> {
        if !module.exists() {
            return Err(CertificateError::ModuleNotFound(module.to_path_buf()));
        }
        let (cert, chain) = read_pem_chain(cert_path)?;

        Ok(Self {
            identity: CertificateIdentity::Pkcs11(Pkcs11Identity {
                module: module.to_path_buf(),
                token_label,
                pin,
                cert,
                chain,
            }),
            ca_bundle,
        })
    }

    /// Reference an identity resident in the operating system keychain.
    ///
    /// The keychain query itself is performed by the platform TLS
    /// integration that consumes this handle.
    #[cfg(target_os = "macos")]
    pub fn from_keychain_identity(
        identity: Option<String>,
        issuer: Option<String>,
        ca_bundle: Option<PathBuf>,
        require_token: bool,
    ) -> Result<Self, CertificateError> {
        Ok(Self {
            identity: CertificateIdentity::Keychain(KeychainIdentity {
                identity,
                issuer,
                require_token,
            }),
            ca_bundle,
        })
    }

    /// Keychain identities require the macOS keychain.
    #[cfg(not(target_os = "macos"))]
    pub fn from_keychain_identity(
        _identity: Option<String>,
        _issuer: Option<String>,
        _ca_bundle: Option<PathBuf>,
        _require_token: bool,
    ) -> Result<Self, CertificateError> {
        Err(CertificateError::KeychainUnsupported)
    }

    /// The distinguished no-certificate value.
    pub fn none(ca_bundle: Option<PathBuf>) -> Self {
        Self {
            identity: CertificateIdentity::None,
            ca_bundle,
        }
    }

    /// Whether any identity is present.
    pub fn has_identity(&self) -> bool {
        !matches!(self.identity, CertificateIdentity::None)
    }

    /// The identity material.
    pub fn identity(&self) -> &CertificateIdentity {
        &self.identity
    }

    /// CA bundle path carried through from the configuration.
    pub fn ca_bundle(&self) -> Option<&Path> {
        self.ca_bundle.as_deref()
    }

    /// Subject of the leaf certificate, if one was loaded from disk.
    pub fn subject(&self) -> Option<String> {
        self.leaf().map(|cert| format_name(cert.subject_name()))
    }

    /// SHA-256 fingerprint of the leaf certificate as colon-separated
    /// hex, if one was loaded from disk.
    pub fn fingerprint(&self) -> Result<Option<String>, CertificateError> {
        let Some(cert) = self.leaf() else {
            return Ok(None);
        };
        let digest = cert.digest(MessageDigest::sha256())?;
        let hex: Vec<String> = digest.iter().map(|byte| format!("{:02X}", byte)).collect();
        Ok(Some(hex.join(":")))
    }

    fn leaf(&self) -> Option<&X509> {
        match &self.identity {
            CertificateIdentity::Local(identity) => Some(&identity.cert),
            CertificateIdentity::Pkcs11(identity) => Some(&identity.cert),
            CertificateIdentity::Keychain(_) | CertificateIdentity::None => None,
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, CertificateError> {
    fs::read(path).map_err(|source| CertificateError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_pem_chain(path: &Path) -> Result<(X509, Vec<X509>), CertificateError> {
    let pem = read_file(path)?;
    let mut certs = X509::stack_from_pem(&pem)?;
    if certs.is_empty() {
        return Err(CertificateError::EmptyChain(path.to_path_buf()));
    }
    let cert = certs.remove(0);
    Ok((cert, certs))
}

fn format_name(name: &X509NameRef) -> String {
    name.entries()
        .filter_map(|entry| {
            let key = entry.object().nid().short_name().ok()?;
            let value = entry.data().as_utf8().ok()?;
            Some(format!("{}={}", key, value))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_marker() {
        let cert = ResolvedCertificate::none(Some(PathBuf::from("ca.crt")));

        assert!(!cert.has_identity());
        assert!(matches!(cert.identity(), CertificateIdentity::None));
        assert_eq!(cert.ca_bundle(), Some(Path::new("ca.crt")));
        assert_eq!(cert.subject(), None);
        assert_eq!(cert.fingerprint().unwrap(), None);
    }

    #[test]
    fn test_missing_pem_file_is_a_read_error() {
        let err = ResolvedCertificate::from_pem_files(
            Path::new("/nonexistent/server.crt"),
            Path::new("/nonexistent/server.key"),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, CertificateError::Read { .. }));
    }

    #[test]
    fn test_missing_pkcs11_module() {
        let err = ResolvedCertificate::from_pkcs11_module(
            Path::new("server.crt"),
            None,
            Path::new("/nonexistent/module.so"),
            None,
            None,
        )
        .unwrap_err();

        assert!(matches!(err, CertificateError::ModuleNotFound(_)));
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_keychain_unsupported_off_macos() {
        let err = ResolvedCertificate::from_keychain_identity(
            Some("tunnel".to_string()),
            None,
            None,
            false,
        )
        .unwrap_err();

        assert!(matches!(err, CertificateError::KeychainUnsupported));
    }
}
