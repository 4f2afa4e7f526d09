//! Request fingerprints for caller-side memoisation.

use sha2::{Digest, Sha256};

/// SHA-256 of `content`, hex encoded.
pub fn calculate_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprint of a serialisable value plus any extra discriminators.
///
/// Serialisation failures fall back to hashing the discriminators alone; the
/// value types used here serialise infallibly.
pub fn fingerprint<T: serde::Serialize>(value: &T, extra: &[&str]) -> String {
    let mut content = serde_json::to_string(value).unwrap_or_default();
    for part in extra {
        content.push('\u{1f}');
        content.push_str(part);
    }
    calculate_checksum(&content)
}
