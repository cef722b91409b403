//! FastCache port - the key-value cache capability set
//!
//! The cache is never authoritative: keys may be missing, stale, or evicted at
//! any time, and every implementation failure is something the coordinator can
//! swallow. Structured values are serialized to JSON text before they get
//! here; the cache itself only sees opaque strings.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::CacheError;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

#[async_trait]
pub trait FastCache: Send + Sync {
    /// Get a string value; `None` when the key is absent
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    /// Set a string value, with an optional TTL in seconds
    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Get every field of a hash; an absent key yields an empty map
    async fn hash_get_all(&self, key: &str) -> CacheResult<HashMap<String, String>>;

    /// Set multiple hash fields at once
    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> CacheResult<()>;

    /// Increment a numeric hash field, returning the new value
    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> CacheResult<i64>;

    /// Add a member to a set
    async fn set_add(&self, key: &str, member: &str) -> CacheResult<()>;

    /// All members of a set; an absent key yields an empty vec
    async fn set_members(&self, key: &str) -> CacheResult<Vec<String>>;

    /// Delete a key; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Set a TTL on an existing key; returns false when the key is absent
    async fn expire(&self, key: &str, ttl_seconds: u64) -> CacheResult<bool>;
}
