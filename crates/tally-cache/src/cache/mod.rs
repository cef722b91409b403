//! FastCache implementations

mod memory;
mod noop;
mod redis_cache;

pub use memory::MemoryCache;
pub use noop::NoopCache;
pub use redis_cache::RedisCache;
