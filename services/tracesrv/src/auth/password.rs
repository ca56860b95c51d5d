//! Password hashing and verification
//!
//! New credentials are Argon2 PHC strings. Rows written before hashing was
//! introduced still hold the raw password; those are matched by plain equality
//! and reported as [`Verification::Legacy`] so the caller can log and rehash.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use errors::{TraceError, TraceResult};

/// Prefix of credentials produced by [`hash`]
pub const HASH_PREFIX: &str = "$argon2";

/// Outcome of checking a password against a stored credential
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// Salted hash matched
    Hashed,
    /// Unhashed credential matched by equality
    Legacy,
    /// Looked like a hash but could not be checked; matched by equality
    MalformedHash,
    Mismatch,
}

impl Verification {
    pub fn is_match(self) -> bool {
        !matches!(self, Self::Mismatch)
    }

    /// Matched through the equality fallback
    pub fn is_degraded(self) -> bool {
        matches!(self, Self::Legacy | Self::MalformedHash)
    }
}

fn equality_fallback(plaintext: &str, stored: &str, matched: Verification) -> Verification {
    if plaintext == stored {
        matched
    } else {
        Verification::Mismatch
    }
}

/// Check `plaintext` against `stored`, reporting which path decided
pub fn check(plaintext: &str, stored: &str) -> Verification {
    if !stored.starts_with(HASH_PREFIX) {
        return equality_fallback(plaintext, stored, Verification::Legacy);
    }

    let parsed = match PasswordHash::new(stored) {
        Ok(parsed) => parsed,
        Err(_) => return equality_fallback(plaintext, stored, Verification::MalformedHash),
    };

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Verification::Hashed,
        Err(password_hash::Error::Password) => Verification::Mismatch,
        // Unsupported algorithm or parameters
        Err(_) => equality_fallback(plaintext, stored, Verification::MalformedHash),
    }
}

pub fn verify(plaintext: &str, stored: &str) -> bool {
    check(plaintext, stored).is_match()
}

/// Hash a password with Argon2 and a fresh 16-byte salt
pub fn hash(plaintext: &str) -> TraceResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes)
        .map_err(|e| TraceError::Internal(format!("salt generation failed: {}", e)))?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| TraceError::Internal(format!("salt encoding failed: {}", e)))?;

    let phc = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| TraceError::Internal(format!("password hashing failed: {}", e)))?
        .to_string();
    Ok(phc)
}
