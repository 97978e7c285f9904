//! Fixed table of provider-facing categories the ledger tracks.
//!
//! Observation lines for any other category are dropped by the snapshot
//! reader, and the reconciler walks this list in order so its output is
//! deterministic before the final sort.

/// Categories recorded in the ledger, in reconciliation order.
pub const SUPPORTED_CATEGORIES: &[&str] = &[
    "AlgorithmParameterGenerator",
    "AlgorithmParameters",
    "CertificateFactory",
    "CertPathBuilder",
    "CertPathValidator",
    "CertStore",
    "Cipher",
    "KeyAgreement",
    "KeyFactory",
    "KeyGenerator",
    "KeyManagerFactory",
    "KeyPairGenerator",
    "KeyStore",
    "Mac",
    "MessageDigest",
    "SecretKeyFactory",
    "SecureRandom",
    "Signature",
    "SSLContext",
    "SSLEngine.Enabled",
    "SSLEngine.Supported",
    "SSLSocket.Enabled",
    "SSLSocket.Supported",
    "TrustManagerFactory",
];

// Protocol and cipher-suite names keep the casing the provider reported.
const CASE_SENSITIVE_CATEGORIES: &[&str] = &[
    "SSLEngine.Enabled",
    "SSLEngine.Supported",
    "SSLSocket.Enabled",
    "SSLSocket.Supported",
];

pub fn is_supported(category: &str) -> bool {
    SUPPORTED_CATEGORIES.contains(&category)
}

/// Whether display names in this category bypass the capitalization fixer.
pub fn is_case_sensitive(category: &str) -> bool {
    CASE_SENSITIVE_CATEGORIES.contains(&category)
}
