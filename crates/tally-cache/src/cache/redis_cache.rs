//! Redis-backed implementation of the FastCache port

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;

use tally_core::error::CacheError;
use tally_core::traits::{CacheResult, FastCache};

use crate::pool::{RedisPool, RedisPoolError};

/// FastCache backed by Redis through the managed pool
#[derive(Debug, Clone)]
pub struct RedisCache {
    pool: RedisPool,
}

impl RedisCache {
    /// Create a new Redis cache on the given pool
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> CacheResult<deadpool_redis::Connection> {
        self.pool.get().await.map_err(map_pool_error)
    }
}

fn map_pool_error(err: RedisPoolError) -> CacheError {
    match err {
        RedisPoolError::CreatePool(msg) => CacheError::Unavailable(msg),
        RedisPoolError::GetConnection(e) => CacheError::Unavailable(e.to_string()),
        RedisPoolError::Redis(e) => map_redis_error(e),
    }
}

fn map_redis_error(err: redis::RedisError) -> CacheError {
    if err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
        CacheError::Unavailable(err.to_string())
    } else {
        CacheError::Command(err.to_string())
    }
}

#[async_trait]
impl FastCache for RedisCache {
    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.conn().await?;
        conn.get(key).await.map_err(map_redis_error)
    }

    async fn set_string(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        match ttl_seconds {
            Some(ttl) => conn
                .set_ex::<_, _, ()>(key, value, ttl)
                .await
                .map_err(map_redis_error),
            None => conn
                .set::<_, _, ()>(key, value)
                .await
                .map_err(map_redis_error),
        }
    }

    async fn hash_get_all(&self, key: &str) -> CacheResult<HashMap<String, String>> {
        let mut conn = self.conn().await?;
        conn.hgetall(key).await.map_err(map_redis_error)
    }

    async fn hash_set(&self, key: &str, fields: &[(&str, String)]) -> CacheResult<()> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn().await?;
        conn.hset_multiple::<_, _, _, ()>(key, fields)
            .await
            .map_err(map_redis_error)
    }

    async fn hash_increment(&self, key: &str, field: &str, delta: i64) -> CacheResult<i64> {
        let mut conn = self.conn().await?;
        conn.hincr(key, field, delta).await.map_err(map_redis_error)
    }

    async fn set_add(&self, key: &str, member: &str) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        conn.sadd::<_, _, ()>(key, member)
            .await
            .map_err(map_redis_error)
    }

    async fn set_members(&self, key: &str) -> CacheResult<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.smembers(key).await.map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> CacheResult<bool> {
        let ttl = i64::try_from(ttl_seconds)
            .map_err(|_| CacheError::Command("TTL value too large".to_string()))?;
        let mut conn = self.conn().await?;
        conn.expire(key, ttl).await.map_err(map_redis_error)
    }
}
