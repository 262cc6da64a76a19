//! Password hash value object
//!
//! Hashing is a deterministic one-way digest: the same input always yields
//! the same hash and the raw value cannot be recovered from it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hashed password as stored in the `password` column
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a raw password
    ///
    /// No salt is mixed in: equal passwords must hash to equal values so
    /// that hashes stay comparable across services sharing the table.
    pub fn from_plain(plain_text: &str) -> Self {
        let digest = Sha256::digest(plain_text.as_bytes());
        Self(hex::encode(digest))
    }

    /// Wrap a hash loaded from storage
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Check a raw password against this hash
    pub fn verify(&self, plain_text: &str) -> bool {
        *self == Self::from_plain(plain_text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

// Don't expose the hash in logs
impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(PasswordHash::from_plain("p"), PasswordHash::from_plain("p"));
    }

    #[test]
    fn test_hash_differs_from_plain_text() {
        let hash = PasswordHash::from_plain("p");
        assert_ne!(hash.as_str(), "p");
        assert_eq!(hash.as_str().len(), 64);
    }

    #[test]
    fn test_verify() {
        let hash = PasswordHash::from_plain("SecurePassword123!");
        assert!(hash.verify("SecurePassword123!"));
        assert!(!hash.verify("WrongPassword123"));
    }

    #[test]
    fn test_from_hash_round_trips_storage_value() {
        let stored = PasswordHash::from_plain("secret").into_string();
        assert!(PasswordHash::from_hash(stored).verify("secret"));
    }

    #[test]
    fn test_debug_is_redacted() {
        let hash = PasswordHash::from_plain("secret");
        assert!(!format!("{hash:?}").contains(hash.as_str()));
    }
}
