//! ObjectId: the content-derived address of a stored object.
//!
//! Identifiers are SHA-256 digests rendered as 64 lowercase hex characters.
//! The type itself is a bare value carrier: [`ObjectId::new`] wraps any
//! string without checking that it was produced by hashing, which is what
//! lets externally supplied hashes (CLI arguments, remote responses) round
//! trip unchanged. Equality and ordering are exact string comparison.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A content hash - 256 bits of SHA-256, 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap an existing hash string without validation.
    ///
    /// Callers round-tripping externally supplied hashes are responsible
    /// for their correctness.
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Hash payload bytes and return the derived identifier.
    pub fn from_data(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        Self(hex::encode(digest))
    }

    /// First two characters, used as the shard directory name.
    pub fn prefix(&self) -> &str {
        self.0.get(..2).unwrap_or(&self.0)
    }

    /// First twelve characters, for logging only. Never used for lookups.
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }

    /// Get the full hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_produces_64_hex_chars() {
        let id = ObjectId::from_data(b"Hello, World!");
        assert_eq!(id.as_str().len(), 64);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!id.as_str().chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn test_from_data_is_deterministic() {
        let id1 = ObjectId::from_data(b"test data");
        let id2 = ObjectId::from_data(b"test data");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_from_data_matches_known_vectors() {
        // Stable across processes and implementations: these are the
        // standard SHA-256 digests.
        assert_eq!(
            ObjectId::from_data(b"hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(
            ObjectId::from_data(b"").as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_from_data_different_input_different_hash() {
        assert_ne!(ObjectId::from_data(b"data a"), ObjectId::from_data(b"data b"));
    }

    #[test]
    fn test_new_does_not_validate() {
        let id = ObjectId::new("stored-id");
        assert_eq!(id.as_str(), "stored-id");
    }

    #[test]
    fn test_prefix_and_short() {
        let id = ObjectId::from_data(b"test");
        assert_eq!(id.prefix().len(), 2);
        assert_eq!(id.short().len(), 12);
        assert!(id.as_str().starts_with(id.short()));
        assert!(id.short().starts_with(id.prefix()));
    }

    #[test]
    fn test_prefix_tolerates_short_tokens() {
        assert_eq!(ObjectId::new("k").prefix(), "k");
        assert_eq!(ObjectId::new("k1").short(), "k1");
        assert_eq!(ObjectId::new("").prefix(), "");
    }

    #[test]
    fn test_display_renders_full_hash() {
        let id = ObjectId::from_data(b"display test");
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_serde_is_a_bare_string() {
        let id = ObjectId::new("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");
        let restored: ObjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, restored);
    }

    #[test]
    fn test_ordering_is_string_ordering() {
        let a = ObjectId::new("aaa");
        let b = ObjectId::new("bbb");
        assert!(a < b);
    }
}
