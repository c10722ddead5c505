//! Password hashing with bcrypt
//!
//! Cost factor 12; plaintext is hashed before storage and never returned.

use worklane_common::{Error, Result};

/// bcrypt cost factor
pub const HASH_COST: u32 = 12;

/// Hash a password for storage
pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, HASH_COST)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored hash.
///
/// Malformed stored hashes count as a failed verification rather than an
/// error; login treats both identically.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
