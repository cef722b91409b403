//! In-memory FastCache for tests
//!
//! HashMap-backed with real TTL expiry so cache-aside behavior (hits, misses,
//! expirations, invalidations) can be exercised without a Redis instance.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use tally_core::error::CacheError;
use tally_core::traits::{CacheResult, FastCache};

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(HashMap<String, String>),
    Set(HashSet<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn live(&self) -> bool {
        self.expires_at.is_none_or(|deadline| Instant::now() < deadline)
    }
}

/// FastCache backed by a process-local map
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemoryCache {
    /// Create an empty in-memory cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys (test helper)
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.values().filter(|e| e.live()).count()
    }

    /// Whether the cache holds no live keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a key is present and unexpired (test helper)
    pub fn contains_key(&self, key: &str) -> bool {
        let entries = self.entries.lock().expect("cache lock poisoned");
        entries.get(key).is_some_and(Entry::live)
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut HashMap<String, Entry>) -> T) -> T {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.retain(|_, e| e.live());
        f(&mut entries)
    }
}

fn deadline(ttl_seconds: Option<u64>) -> Option<Instant> {
    ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl))
}

#[async_trait]
impl FastCache for MemoryCache {
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        self.with_entries(|entries| match entries.get(key) {
            Some(Entry {
                value: Value::Str(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(CacheError::Command(format!("{key}: not a string"))),
            None => Ok(None),
        })
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.with_entries(|entries| {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Str(value.to_string()),
                    expires_at: deadline(ttl_seconds),
                },
            );
        });
        Ok(())
    }

    async fn hash_get_all(&self, key: &str) -> CacheResult<HashMap<String, String>> {
        self.with_entries(|entries| match entries.get(key) {
            Some(Entry {
                value: Value::Hash(map),
                ..
            }) => Ok(map.clone()),
            Some(_) => Err(CacheError::Command(format!("{key}: not a hash"))),
            None => Ok(HashMap::new()),
        })
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> CacheResult<()> {
        self.with_entries(|entries| {
            let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
                value: Value::Hash(HashMap::new()),
                expires_at: None,
            });
            match &mut entry.value {
                Value::Hash(map) => {
                    for (field, value) in fields {
                        map.insert((*field).to_string(), value.clone());
                    }
                    Ok(())
                }
                _ => Err(CacheError::Command(format!("{key}: not a hash"))),
            }
        })
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> CacheResult<i64> {
        self.with_entries(|entries| {
            let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
                value: Value::Hash(HashMap::new()),
                expires_at: None,
            });
            match &mut entry.value {
                Value::Hash(map) => {
                    let current = map
                        .get(field)
                        .map(|v| v.parse::<i64>())
                        .transpose()
                        .map_err(|e| CacheError::Command(e.to_string()))?
                        .unwrap_or(0);
                    let next = current + delta;
                    map.insert(field.to_string(), next.to_string());
                    Ok(next)
                }
                _ => Err(CacheError::Command(format!("{key}: not a hash"))),
            }
        })
    }

    async fn set_add(&self, key: &str, member: &str) -> CacheResult<()> {
        self.with_entries(|entries| {
            let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
                value: Value::Set(HashSet::new()),
                expires_at: None,
            });
            match &mut entry.value {
                Value::Set(set) => {
                    set.insert(member.to_string());
                    Ok(())
                }
                _ => Err(CacheError::Command(format!("{key}: not a set"))),
            }
        })
    }

    async fn set_members(&self, key: &str) -> CacheResult<Vec<String>> {
        self.with_entries(|entries| match entries.get(key) {
            Some(Entry {
                value: Value::Set(set),
                ..
            }) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(CacheError::Command(format!("{key}: not a set"))),
            None => Ok(Vec::new()),
        })
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        });
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> CacheResult<bool> {
        self.with_entries(|entries| match entries.get_mut(key) {
            Some(entry) => {
                entry.expires_at = deadline(Some(ttl_seconds));
                Ok(true)
            }
            None => Ok(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_string_roundtrip() {
        let cache = MemoryCache::new();
        cache.set_string("k", "v", None).await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap().as_deref(), Some("v"));

        cache.delete("k").await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let cache = MemoryCache::new();
        cache.set_string("k", "v", Some(0)).await.unwrap();
        assert_eq!(cache.get_string("k").await.unwrap(), None);
        assert!(!cache.contains_key("k"));
    }

    #[tokio::test]
    async fn test_hash_fields_and_increment() {
        let cache = MemoryCache::new();
        cache
            .hash_set("h", &[("regular", "2".to_string()), ("fake", "0".to_string())])
            .await
            .unwrap();
        assert_eq!(cache.hash_increment("h", "regular", 3).await.unwrap(), 5);

        let map = cache.hash_get_all("h").await.unwrap();
        assert_eq!(map.get("regular").map(String::as_str), Some("5"));
        assert_eq!(map.get("fake").map(String::as_str), Some("0"));
    }

    #[tokio::test]
    async fn test_set_membership() {
        let cache = MemoryCache::new();
        cache.set_add("s", "1").await.unwrap();
        cache.set_add("s", "2").await.unwrap();
        cache.set_add("s", "1").await.unwrap();

        let mut members = cache.set_members("s").await.unwrap();
        members.sort();
        assert_eq!(members, vec!["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_expire_existing_key() {
        let cache = MemoryCache::new();
        cache.set_string("k", "v", None).await.unwrap();
        assert!(cache.expire("k", 0).await.unwrap());
        assert_eq!(cache.get_string("k").await.unwrap(), None);
        assert!(!cache.expire("missing", 5).await.unwrap());
    }

    #[tokio::test]
    async fn test_type_mismatch_is_an_error() {
        let cache = MemoryCache::new();
        cache.set_string("k", "v", None).await.unwrap();
        assert!(cache.hash_get_all("k").await.is_err());
        assert!(cache.set_members("k").await.is_err());
    }
}
