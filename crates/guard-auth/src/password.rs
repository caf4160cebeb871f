//! One-way password hashing.
//!
//! Digests are Argon2id PHC strings (`$argon2id$v=19$...`) with an embedded
//! random salt, so the same plaintext never hashes to the same digest twice.

use argon2::password_hash::{PasswordHash, SaltString};
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

use crate::error::AuthError;

/// Hash a plaintext password.
///
/// # Errors
///
/// Returns `AuthError::Hashing` if Argon2 rejects the input.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Check a plaintext password against a stored digest.
///
/// A malformed digest verifies as `false`, never as an error.
#[must_use]
pub fn verify_password(plaintext: &str, digest: &str) -> bool {
    PasswordHash::new(digest)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Digest checked when an account has no stored digest, so a miss costs a
/// full Argon2 verification like a wrong password does.
static DECOY_DIGEST: OnceLock<String> = OnceLock::new();

fn decoy_digest() -> &'static str {
    DECOY_DIGEST.get_or_init(|| hash_password("cloudguard-decoy-password").unwrap_or_default())
}

/// Check a plaintext password against an optional stored digest.
///
/// With no digest the plaintext is still verified against a decoy and the
/// result is always `false`. Both outcomes take the same time.
#[must_use]
pub fn verify_password_or_decoy(plaintext: &str, digest: Option<&str>) -> bool {
    match digest {
        Some(digest) => verify_password(plaintext, digest),
        None => {
            let _ = verify_password(plaintext, decoy_digest());
            false
        }
    }
}
