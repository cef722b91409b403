//! # tally-cache
//!
//! FastCache implementations: a Redis-backed cache on a managed connection
//! pool, plus a no-op cache for running without Redis and an in-memory cache
//! for tests. The coordinator in `tally-service` treats all three identically
//! through the `FastCache` port.

pub mod cache;
pub mod pool;

// Re-export pool types
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};

// Re-export cache implementations
pub use cache::{MemoryCache, NoopCache, RedisCache};
