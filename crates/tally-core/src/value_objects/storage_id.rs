//! Storage epoch identifier
//!
//! A guild's invite counters live under a storage epoch. Resetting the counters
//! allocates a fresh epoch id and repoints the guild at it; the old epoch stays
//! behind, readable and restorable. Ids are random so an old epoch cannot be
//! guessed from a newer one. No uniqueness check is performed on generation:
//! at 16 base-36 characters the collision probability is negligible, and the
//! epoch table's primary key would reject a same-guild collision anyway.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a storage epoch id, in characters
pub const STORAGE_ID_LEN: usize = 16;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random, fixed-length, base-36 storage epoch identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageId(String);

impl StorageId {
    /// Generate a fresh random epoch id
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let id: String = (0..STORAGE_ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(id)
    }

    /// View as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an id that came from storage or a caller
    pub fn parse(s: &str) -> Result<Self, StorageIdParseError> {
        if s.len() != STORAGE_ID_LEN {
            return Err(StorageIdParseError::BadLength(s.len()));
        }
        if !s.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(StorageIdParseError::BadCharacter);
        }
        Ok(Self(s.to_string()))
    }
}

/// Error when parsing a StorageId from string
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StorageIdParseError {
    #[error("storage id must be {STORAGE_ID_LEN} characters, got {0}")]
    BadLength(usize),

    #[error("storage id must be lowercase base-36")]
    BadCharacter,
}

impl fmt::Display for StorageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StorageId {
    type Err = StorageIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StorageId::parse(s)
    }
}

impl AsRef<str> for StorageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_length_and_alphabet() {
        let id = StorageId::generate();
        assert_eq!(id.as_str().len(), STORAGE_ID_LEN);
        assert!(id.as_str().bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generated_ids_differ() {
        let mut seen = HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(StorageId::generate()), "duplicate epoch id");
        }
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = StorageId::generate();
        let parsed = StorageId::parse(id.as_str()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            StorageId::parse("short"),
            Err(StorageIdParseError::BadLength(5))
        );
        assert_eq!(
            StorageId::parse("UPPERCASE0000000"),
            Err(StorageIdParseError::BadCharacter)
        );
    }

    #[test]
    fn test_serde_transparent() {
        let id = StorageId::parse("0123456789abcdef").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0123456789abcdef\"");
        let back: StorageId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
