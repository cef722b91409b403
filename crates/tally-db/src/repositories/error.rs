//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tally_core::error::StoreError;

/// Convert a SQLx error to the store taxonomy.
///
/// Connection-class failures become `StoreUnavailable`, everything else
/// becomes `QueryFailed`. Missing rows never pass through here; repositories
/// represent those as `None`/empty per the NotFound-as-empty rule.
pub fn map_db_error(e: SqlxError) -> StoreError {
    match e {
        SqlxError::Io(_)
        | SqlxError::Tls(_)
        | SqlxError::PoolTimedOut
        | SqlxError::PoolClosed
        | SqlxError::WorkerCrashed => StoreError::StoreUnavailable(e.to_string()),
        other => StoreError::QueryFailed(other.to_string()),
    }
}
