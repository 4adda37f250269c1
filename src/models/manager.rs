//! Manager credential model for basic authentication.
//!
//! Passwords are stored as hex-encoded SHA-256 digests and compared in
//! constant time.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Represents a row of the `managers` table used by basic auth.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ManagerCredential {
    pub login: String,

    /// Hex-encoded SHA-256 digest of the password
    pub password: String,
}

impl ManagerCredential {
    /// Check a clear-text password against the stored digest.
    ///
    /// The comparison runs in constant time over the digest bytes.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = hash_password(password);
        candidate
            .as_bytes()
            .ct_eq(self.password.to_ascii_lowercase().as_bytes())
            .into()
    }
}

/// Hex-encoded SHA-256 digest of a clear-text password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
