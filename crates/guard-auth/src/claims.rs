use serde::{Deserialize, Serialize};

/// Registered claims carried by a Cloud Guard bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject: the user's email address.
    pub sub: String,
    /// Expiration, seconds since the Unix epoch.
    pub exp: i64,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
}
