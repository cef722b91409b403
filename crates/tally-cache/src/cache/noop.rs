//! No-op FastCache for running without Redis
//!
//! Every read misses, every write is accepted and discarded. Because the
//! cache is never authoritative, the store behaves identically (just slower)
//! with this implementation plugged in.

use std::collections::HashMap;

use async_trait::async_trait;

use tally_core::traits::{CacheResult, FastCache};

/// FastCache that remembers nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Create a no-op cache
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FastCache for NoopCache {
    async fn get_string(&self, _key: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_string(
        &self,
        _key: &str,
        _value: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn hash_get_all(&self, _key: &str) -> CacheResult<HashMap<String, String>> {
        Ok(HashMap::new())
    }

    async fn hash_set(&self, _key: &str, _fields: &[(&str, String)]) -> CacheResult<()> {
        Ok(())
    }

    async fn hash_increment(&self, _key: &str, _field: &str, delta: i64) -> CacheResult<i64> {
        Ok(delta)
    }

    async fn set_add(&self, _key: &str, _member: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn set_members(&self, _key: &str) -> CacheResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn delete(&self, _key: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn expire(&self, _key: &str, _ttl_seconds: u64) -> CacheResult<bool> {
        Ok(false)
    }
}
