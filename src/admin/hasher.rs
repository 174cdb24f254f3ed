//! Password hashing.
//!
//! Hashes are stored as `blake3$<salt hex>$<digest hex>`. The scheme prefix
//! is part of the stored value so a future scheme can coexist with existing
//! records.

use std::fmt::Write as _;

/// The scheme identifier embedded in stored hashes.
pub const SCHEME: &str = "blake3";

const SALT_LEN: usize = 16;

/// Hashes a password with a freshly generated salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    hash_with_salt(password, &salt)
}

/// Verifies a password against a stored `scheme$salt$digest` value. Any
/// malformed or foreign-scheme value simply fails verification.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');

    let (Some(scheme), Some(salt_hex), Some(_digest)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    if scheme != SCHEME {
        return false;
    }

    let Some(salt) = decode_hex(salt_hex) else {
        return false;
    };

    // Recomputing and comparing the full stored string keeps the comparison
    // independent of how the digest was formatted.
    hash_with_salt(password, &salt) == stored
}

fn hash_with_salt(password: &str, salt: &[u8]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());

    format!(
        "{}${}${}",
        SCHEME,
        encode_hex(salt),
        hasher.finalize().to_hex()
    )
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }

    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("hunter2");

        assert!(stored.starts_with("blake3$"));
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        assert_ne!(hash_password("hunter2"), hash_password("hunter2"));
    }

    #[test]
    fn test_malformed_stored_values_fail_closed() {
        assert!(!verify_password("hunter2", ""));
        assert!(!verify_password("hunter2", "plaintext"));
        assert!(!verify_password("hunter2", "md5$00$abc"));
        assert!(!verify_password("hunter2", "blake3$zz$abc"));
    }
}
