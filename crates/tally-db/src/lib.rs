//! # tally-db
//!
//! DurableStore implementation: PostgreSQL via SQLx.
//!
//! This crate provides PostgreSQL implementations for the repository ports
//! defined in `tally-core`. It handles:
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ model mappers
//! - Repository implementations
//!
//! Statements are always parameterized. The only thing ever interpolated into
//! SQL text is a column name that has already passed an allow-list enum in
//! `tally-core`.

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAlertRepository, PgBlacklistRepository, PgGuildSettingsRepository, PgGuildStorageRepository,
    PgMemberEventRepository, PgMemberRepository, PgPaymentRepository, PgPluginRepository,
    PgSubscriptionRepository,
};
