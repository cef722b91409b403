//! # tally-common
//!
//! Shared utilities: environment-driven configuration and telemetry setup.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, CacheConfig, ConfigError, DatabaseConfig, Environment, RedisConfig,
};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig, TracingError};
