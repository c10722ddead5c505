//! JWT claims types

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The `token_type` value carried by refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims encoded into access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Email
    pub email: String,
    /// Role string (`ADMIN`, `MANAGER`, `MEMBER`)
    pub role: String,
    /// Permission set derived from the role at issue time
    pub permissions: BTreeSet<String>,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expires at
    pub exp: i64,
}

/// Claims encoded into refresh tokens.
///
/// Carries no role or permissions: a refresh token only proves identity,
/// and a new pair is minted from the user's current stored role.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Token type discriminator, always `"refresh"` for tokens we issue
    pub token_type: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Issued at
    pub iat: i64,
    /// Expires at
    pub exp: i64,
}
