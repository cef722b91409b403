//! Error types for the persistence layer

mod store_error;

pub use store_error::{CacheError, StoreError};
