// src/backend/utils/crypto.rs
use sha2::{Digest, Sha256};

/// Calculates the SHA256 hash of byte data and returns it as a hex string.
pub fn calculate_sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Compares a candidate passphrase against a stored hex digest.
/// The digest comparison is case-insensitive so operators may paste either form.
pub fn passphrase_matches(candidate: &str, expected_sha256_hex: &str) -> bool {
    calculate_sha256_hex(candidate.as_bytes()).eq_ignore_ascii_case(expected_sha256_hex.trim())
}
