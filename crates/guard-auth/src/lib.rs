//! # guard-auth
//!
//! Credential handling for Cloud Guard.
//!
//! Two independent collaborators: a one-way password hash/verify pair
//! (Argon2id, PHC-formatted digests) and a shared-secret bearer token
//! service (HMAC-signed JWTs with a fixed expiry window). Callers only ever
//! get back a subject string from a valid token, or a rejection.

pub mod claims;
pub mod error;
pub mod password;
pub mod token;

pub use claims::Claims;
pub use error::AuthError;
pub use password::{hash_password, verify_password, verify_password_or_decoy};
pub use token::TokenService;
