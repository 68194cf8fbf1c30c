//! Cipher-suite registry
//!
//! Immutable name-to-identifier tables mapping operator-facing family
//! names to IANA cipher-suite code points. The safe tier is always
//! available; the unsafe tier is reachable only with an explicit opt-in.
//! The family names form an operator-visible vocabulary: adding or
//! removing an entry is a compatibility-affecting change.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::config::ConfigError;

/// IANA cipher-suite code points used by the registry tables.
pub mod suites {
    // TLS 1.3
    pub const TLS_AES_128_GCM_SHA256: u16 = 0x1301;
    pub const TLS_AES_256_GCM_SHA384: u16 = 0x1302;
    pub const TLS_CHACHA20_POLY1305_SHA256: u16 = 0x1303;

    // ECDHE, AEAD
    pub const TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256: u16 = 0xc02b;
    pub const TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256: u16 = 0xc02f;
    pub const TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384: u16 = 0xc02c;
    pub const TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384: u16 = 0xc030;
    pub const TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256: u16 = 0xcca9;
    pub const TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256: u16 = 0xcca8;

    // ECDHE, CBC
    pub const TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256: u16 = 0xc023;
    pub const TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256: u16 = 0xc027;
    pub const TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA: u16 = 0xc009;
    pub const TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA: u16 = 0xc013;
    pub const TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA: u16 = 0xc00a;
    pub const TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA: u16 = 0xc014;
    pub const TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA: u16 = 0xc012;

    // Static RSA key exchange
    pub const TLS_RSA_WITH_AES_128_GCM_SHA256: u16 = 0x009c;
    pub const TLS_RSA_WITH_AES_256_GCM_SHA384: u16 = 0x009d;
    pub const TLS_RSA_WITH_AES_128_CBC_SHA256: u16 = 0x003c;
    pub const TLS_RSA_WITH_AES_128_CBC_SHA: u16 = 0x002f;
    pub const TLS_RSA_WITH_AES_256_CBC_SHA: u16 = 0x0035;
    pub const TLS_RSA_WITH_3DES_EDE_CBC_SHA: u16 = 0x000a;
}

use suites::*;

// Within each family, ECDSA-authenticated suites are listed ahead of RSA
// ones so multi-certificate deployments prefer ECDSA, and AES-128 ahead
// of AES-256 for performance.

/// Modern AEAD suites: TLS 1.3 and ECDHE AES-GCM.
static AES_FAMILY: &[u16] = &[
    TLS_AES_128_GCM_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    TLS_AES_256_GCM_SHA384,
    TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
];

/// ChaCha20-Poly1305 suites.
static CHACHA_FAMILY: &[u16] = &[
    TLS_CHACHA20_POLY1305_SHA256,
    TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
];

/// Legacy CBC-mode suites, including 3DES for maximum compatibility.
static CBC_FAMILY: &[u16] = &[
    TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256,
    TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA,
    TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
    TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA,
    TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA,
    TLS_ECDHE_RSA_WITH_3DES_EDE_CBC_SHA,
];

/// Static-RSA key-exchange suites for legacy peers without ECDHE.
static RSA_FAMILY: &[u16] = &[
    TLS_RSA_WITH_AES_128_GCM_SHA256,
    TLS_RSA_WITH_AES_256_GCM_SHA384,
    TLS_RSA_WITH_AES_128_CBC_SHA256,
    TLS_RSA_WITH_AES_128_CBC_SHA,
    TLS_RSA_WITH_AES_256_CBC_SHA,
    TLS_RSA_WITH_3DES_EDE_CBC_SHA,
];

// Some Azure Cache for Redis tiers negotiate only this CBC suite.
static UNSAFE_AZURE_FAMILY: &[u16] = &[TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256];

static SAFE_CIPHER_SUITES: Lazy<HashMap<&'static str, &'static [u16]>> = Lazy::new(|| {
    HashMap::from([
        ("AES", AES_FAMILY),
        ("CHACHA", CHACHA_FAMILY),
        ("CBC", CBC_FAMILY),
        ("RSA", RSA_FAMILY),
    ])
});

/// Compatibility-only suites, unlocked by the unsafe opt-in flag. New
/// entries are added only to work around interoperability problems with
/// large providers, and each must be individually justified.
static UNSAFE_CIPHER_SUITES: Lazy<HashMap<&'static str, &'static [u16]>> =
    Lazy::new(|| HashMap::from([("UNSAFE-AZURE", UNSAFE_AZURE_FAMILY)]));

/// Resolve a cipher-suite family name to its identifier list.
///
/// Surrounding whitespace is trimmed. The safe table is consulted first;
/// the unsafe table only when `allow_unsafe` is set. Unknown names fail
/// regardless of the flag.
pub fn resolve_cipher_family(
    name: &str,
    allow_unsafe: bool,
) -> Result<&'static [u16], ConfigError> {
    let name = name.trim();

    if let Some(ids) = SAFE_CIPHER_SUITES.get(name).copied() {
        return Ok(ids);
    }

    match UNSAFE_CIPHER_SUITES.get(name).copied() {
        Some(ids) if allow_unsafe => Ok(ids),
        Some(_) => Err(ConfigError::UnsafeCipherSuite(name.to_string())),
        None => Err(ConfigError::UnknownCipherSuite(name.to_string())),
    }
}
