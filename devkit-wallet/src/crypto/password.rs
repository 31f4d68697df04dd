//! Password hashing for the credential gate
//!
//! New records are Argon2id PHC strings with a random salt. Records written by
//! earlier versions of the wallet hold an unsalted SHA-256 hex digest; those are
//! still accepted by [`verify_password`] but never produced.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 8;

const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Which strength criteria a password meets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub length: bool,
    pub lowercase: bool,
    pub uppercase: bool,
    pub number: bool,
    pub symbol: bool,
}

impl PasswordStrength {
    /// Evaluate a candidate password
    pub fn of(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LEN,
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            symbol: password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
        }
    }

    /// Number of criteria met, 0 through 5
    pub fn score(&self) -> u8 {
        [self.length, self.lowercase, self.uppercase, self.number, self.symbol]
            .iter()
            .filter(|met| **met)
            .count() as u8
    }
}

/// Reject passwords that do not meet the mandatory policy
pub fn check_password_policy(password: &str) -> Result<()> {
    if !PasswordStrength::of(password).length {
        return Err(Error::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Hash a password into an Argon2id PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let mut salt = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| Error::EntropyUnavailable(e.to_string()))?;

    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| Error::InvalidInput(format!("Failed to encode salt: {}", e)))?;

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::InvalidInput(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Check a candidate password against a stored digest
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    if is_legacy_digest(stored) {
        let digest = legacy_sha256_digest(candidate);
        return bool::from(digest.as_bytes().ct_eq(stored.as_bytes()));
    }

    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Unsalted SHA-256 hex digest used by legacy records
pub fn legacy_sha256_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

fn is_legacy_digest(stored: &str) -> bool {
    stored.len() == 64 && stored.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Str0ng!Pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Str0ng!Pass", &hash));
        assert!(!verify_password("Str0ng!Pasz", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("Str0ng!Pass").unwrap();
        let b = hash_password("Str0ng!Pass").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Str0ng!Pass", &b));
    }

    #[test]
    fn test_legacy_digest_still_verifies() {
        let stored = legacy_sha256_digest("hunter22");
        assert_eq!(
            legacy_sha256_digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn test_garbage_digest_never_verifies() {
        assert!(!verify_password("anything", ""));
        assert!(!verify_password("anything", "not-a-hash"));
    }

    #[test]
    fn test_strength_score() {
        assert_eq!(PasswordStrength::of("").score(), 0);
        assert_eq!(PasswordStrength::of("abcdefgh").score(), 2);
        assert_eq!(PasswordStrength::of("Str0ng!Pass").score(), 5);

        let strength = PasswordStrength::of("ABC123");
        assert!(!strength.length);
        assert!(strength.uppercase && strength.number);
        assert!(!strength.lowercase && !strength.symbol);
    }

    #[test]
    fn test_password_policy() {
        assert!(check_password_policy("short").is_err());
        assert!(check_password_policy("longenough").is_ok());
    }
}
