//! Address fingerprints
//!
//! Raw flow records carry SHA-256 digests instead of plaintext addresses.
//! Plaintext addresses from detection events go through `fingerprint`
//! before any comparison against them.

use sha2::{Digest, Sha256};

/// Length of a hex encoded SHA-256 digest
pub const FINGERPRINT_LEN: usize = 64;

/// Lowercase hex SHA-256 of the input
pub fn fingerprint(input: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_ref());
    hex::encode(hasher.finalize())
}

/// Whether `value` looks like an output of `fingerprint`
pub fn is_fingerprint(value: &str) -> bool {
    value.len() == FINGERPRINT_LEN
        && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
