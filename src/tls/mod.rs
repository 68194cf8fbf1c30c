//! TLS handling module
//!
//! This module contains the cipher-suite registry, negotiation-policy
//! construction, and certificate source resolution.

pub mod cert;
pub mod cipher;
pub mod policy;
pub mod source;

pub use self::cert::{CertificateError, CertificateIdentity, ResolvedCertificate};
pub use self::cipher::resolve_cipher_family;
pub use self::policy::{
    build_client_policy, build_server_policy, NamedGroup, RolePolicy, TlsPolicy, TlsVersion,
    CURVE_PREFERENCES, MIN_TLS_VERSION,
};
pub use self::source::{resolve_certificate, select_certificate_source, CertificateSourceKind};
