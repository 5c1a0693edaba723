//! Credential digests.
//!
//! Passwords are stored as a single unsalted SHA-256 round encoded as
//! lowercase hex. This matches digests already present in existing
//! databases; it is weak against precomputed tables and should be replaced
//! by a salted KDF together with a migration of stored digests.

use sha2::{Digest, Sha256};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Hex-encoded SHA-256 of the password's UTF-8 bytes.
pub fn digest_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Compare a candidate password against a stored digest.
pub fn verify_password(password: &str, stored_digest: &str) -> bool {
    digest_password(password).eq_ignore_ascii_case(stored_digest)
}

pub fn meets_min_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digest() {
        assert_eq!(
            digest_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_verify() {
        let stored = digest_password("secret1");
        assert!(verify_password("secret1", &stored));
        assert!(verify_password("secret1", &stored.to_uppercase()));
        assert!(!verify_password("secret2", &stored));
    }

    #[test]
    fn test_min_length_counts_chars() {
        assert!(!meets_min_length("12345"));
        assert!(meets_min_length("123456"));
        assert!(meets_min_length("ññññññ"));
    }
}
