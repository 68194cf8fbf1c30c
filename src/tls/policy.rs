//! TLS negotiation policy
//!
//! Builds the per-role negotiation policy (cipher suites, protocol
//! version floor, curve preferences) from an operator cipher-suite
//! selection. Client and server policies share one generic builder; the
//! server role adds its own settings on top.

use std::fmt;

use crate::config::ConfigError;
use crate::tls::cipher::resolve_cipher_family;

/// TLS protocol version, by wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u16)]
pub enum TlsVersion {
    Tls10 = 0x0301,
    Tls11 = 0x0302,
    Tls12 = 0x0303,
    Tls13 = 0x0304,
}

impl TlsVersion {
    /// The version's wire value.
    pub fn wire_value(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsVersion::Tls10 => write!(f, "TLS 1.0"),
            TlsVersion::Tls11 => write!(f, "TLS 1.1"),
            TlsVersion::Tls12 => write!(f, "TLS 1.2"),
            TlsVersion::Tls13 => write!(f, "TLS 1.3"),
        }
    }
}

/// Oldest protocol version still accepted for compatibility with legacy
/// peers. Fixed; not operator-configurable.
pub const MIN_TLS_VERSION: TlsVersion = TlsVersion::Tls10;

/// Elliptic-curve group, by IANA named-group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum NamedGroup {
    X25519 = 0x001d,
    P256 = 0x0017,
    P384 = 0x0018,
    P521 = 0x0019,
}

impl NamedGroup {
    /// The group's IANA identifier.
    pub fn id(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for NamedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamedGroup::X25519 => write!(f, "X25519"),
            NamedGroup::P256 => write!(f, "P-256"),
            NamedGroup::P384 => write!(f, "P-384"),
            NamedGroup::P521 => write!(f, "P-521"),
        }
    }
}

// X25519 and P-256 have assembly implementations on x86-64; the
// remaining NIST curves follow in ascending strength.
/// Server curve preference order.
pub const CURVE_PREFERENCES: [NamedGroup; 4] = [
    NamedGroup::X25519,
    NamedGroup::P256,
    NamedGroup::P384,
    NamedGroup::P521,
];

/// Role-specific policy extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RolePolicy {
    /// Clients apply no settings beyond the generic policy.
    Client,
    /// Servers add the client-certificate requirement and the curve
    /// preference order.
    Server {
        client_auth_required: bool,
        curve_preferences: Vec<NamedGroup>,
    },
}

/// TLS negotiation policy for one role
///
/// Immutable after construction. The cipher-suite list preserves the
/// operator's family order verbatim and is never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    /// Protocol version floor
    pub min_version: TlsVersion,

    /// Negotiable cipher suites, in operator-selected family order
    pub cipher_suites: Vec<u16>,

    /// Prefer this side's suite order over the peer's
    pub prefer_server_cipher_order: bool,

    /// Role-specific extension
    pub role: RolePolicy,
}

impl TlsPolicy {
    /// Whether this is a server policy.
    pub fn is_server(&self) -> bool {
        matches!(self.role, RolePolicy::Server { .. })
    }

    /// Server curve preferences; `None` for client policies.
    pub fn curve_preferences(&self) -> Option<&[NamedGroup]> {
        match &self.role {
            RolePolicy::Server {
                curve_preferences, ..
            } => Some(curve_preferences),
            RolePolicy::Client => None,
        }
    }

    /// Server client-certificate requirement; `None` for client policies.
    pub fn client_auth_required(&self) -> Option<bool> {
        match &self.role {
            RolePolicy::Server {
                client_auth_required,
                ..
            } => Some(*client_auth_required),
            RolePolicy::Client => None,
        }
    }
}

/// Resolve a comma-separated family selection into a flat suite list.
///
/// Families are concatenated in the order listed. The first unknown or
/// non-permitted family aborts the whole build.
fn resolve_suite_selection(selection: &str, allow_unsafe: bool) -> Result<Vec<u16>, ConfigError> {
    let mut suite_ids = Vec::new();
    for family in selection.split(',') {
        suite_ids.extend_from_slice(resolve_cipher_family(family, allow_unsafe)?);
    }
    Ok(suite_ids)
}

/// Build the role-independent base policy.
fn build_policy(
    selection: &str,
    allow_unsafe: bool,
    role: RolePolicy,
) -> Result<TlsPolicy, ConfigError> {
    Ok(TlsPolicy {
        min_version: MIN_TLS_VERSION,
        cipher_suites: resolve_suite_selection(selection, allow_unsafe)?,
        prefer_server_cipher_order: true,
        role,
    })
}

/// Build a client negotiation policy.
pub fn build_client_policy(selection: &str, allow_unsafe: bool) -> Result<TlsPolicy, ConfigError> {
    // No extra settings on top of the generic policy for client contexts.
    build_policy(selection, allow_unsafe, RolePolicy::Client)
}

/// Build a server negotiation policy.
///
/// Client certificates are not required by default; whether a peer is
/// authorized is a higher-layer decision.
pub fn build_server_policy(selection: &str, allow_unsafe: bool) -> Result<TlsPolicy, ConfigError> {
    build_policy(
        selection,
        allow_unsafe,
        RolePolicy::Server {
            client_auth_required: false,
            curve_preferences: CURVE_PREFERENCES.to_vec(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tls::cipher::resolve_cipher_family;

    #[test]
    fn test_family_order_is_preserved() {
        let policy = build_client_policy("AES,CHACHA", false).unwrap();

        let mut expected = resolve_cipher_family("AES", false).unwrap().to_vec();
        expected.extend_from_slice(resolve_cipher_family("CHACHA", false).unwrap());
        assert_eq!(policy.cipher_suites, expected);

        let reversed = build_client_policy("CHACHA,AES", false).unwrap();
        assert_ne!(policy.cipher_suites, reversed.cipher_suites);
    }

    #[test]
    fn test_duplicate_families_are_not_deduplicated() {
        let policy = build_client_policy("AES,AES", false).unwrap();
        let family = resolve_cipher_family("AES", false).unwrap();

        assert_eq!(policy.cipher_suites.len(), family.len() * 2);
        assert_eq!(&policy.cipher_suites[..family.len()], family);
        assert_eq!(&policy.cipher_suites[family.len()..], family);
    }

    #[test]
    fn test_generic_settings() {
        let policy = build_client_policy("AES", false).unwrap();

        assert_eq!(policy.min_version, TlsVersion::Tls10);
        assert!(policy.prefer_server_cipher_order);
        assert!(!policy.cipher_suites.is_empty());
    }

    #[test]
    fn test_server_policy_defaults() {
        let policy = build_server_policy("AES", false).unwrap();

        assert!(policy.is_server());
        assert_eq!(policy.client_auth_required(), Some(false));
        assert_eq!(
            policy.curve_preferences(),
            Some(&CURVE_PREFERENCES[..]),
        );
    }

    #[test]
    fn test_client_policy_has_no_server_fields() {
        let policy = build_client_policy("AES", false).unwrap();

        assert!(!policy.is_server());
        assert_eq!(policy.client_auth_required(), None);
        assert_eq!(policy.curve_preferences(), None);
    }

    #[test]
    fn test_curve_preference_order() {
        let policy = build_server_policy("AES", false).unwrap();
        let curves = policy.curve_preferences().unwrap();

        assert_eq!(
            curves,
            &[
                NamedGroup::X25519,
                NamedGroup::P256,
                NamedGroup::P384,
                NamedGroup::P521,
            ]
        );
    }

    #[test]
    fn test_first_error_aborts_build() {
        assert!(build_client_policy("AES,BOGUS", false).is_err());
        assert!(build_server_policy("BOGUS,AES", false).is_err());
    }

    #[test]
    fn test_empty_selection_fails() {
        assert!(build_client_policy("", false).is_err());
    }

    #[test]
    fn test_whitespace_around_families() {
        let policy = build_client_policy(" AES , CHACHA ", false).unwrap();
        let plain = build_client_policy("AES,CHACHA", false).unwrap();
        assert_eq!(policy.cipher_suites, plain.cipher_suites);
    }

    #[test]
    fn test_named_group_ids() {
        assert_eq!(NamedGroup::X25519.id(), 0x001d);
        assert_eq!(NamedGroup::P256.id(), 0x0017);
        assert_eq!(NamedGroup::P384.id(), 0x0018);
        assert_eq!(NamedGroup::P521.id(), 0x0019);
    }

    #[test]
    fn test_version_ordering() {
        assert!(TlsVersion::Tls10 < TlsVersion::Tls13);
        assert_eq!(TlsVersion::Tls12.wire_value(), 0x0303);
        assert_eq!(format!("{}", TlsVersion::Tls13), "TLS 1.3");
    }
}
