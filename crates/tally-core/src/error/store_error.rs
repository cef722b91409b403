//! Persistence error taxonomy
//!
//! `StoreError` is what callers of the facade see. The relational store is the
//! correctness boundary: its failures always surface. Cache failures are only
//! represented here so the cache adapters have something to map into; the
//! coordinator swallows them before they reach a caller.

use thiserror::Error;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller supplied a field name outside the entity's allow-list.
    /// Raised before any store is touched.
    #[error("unknown {entity} setting: {name}")]
    UnknownSetting { entity: &'static str, name: String },

    /// Caller supplied a value the named setting cannot hold
    #[error("invalid value for {setting}: {value}")]
    InvalidValue {
        setting: &'static str,
        value: String,
    },

    /// The relational store could not be reached
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A relational statement failed
    #[error("store query failed: {0}")]
    QueryFailed(String),

    /// The cache failed during a best-effort step. Never propagated past the
    /// coordinator; logged and swallowed there.
    #[error("cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl StoreError {
    /// Create an allow-list rejection
    pub fn unknown_setting(entity: &'static str, name: impl Into<String>) -> Self {
        Self::UnknownSetting {
            entity,
            name: name.into(),
        }
    }

    /// Create a bad-value rejection
    pub fn invalid_value(setting: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            setting,
            value: value.into(),
        }
    }

    /// Check whether this error was raised before any I/O happened
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownSetting { .. } | Self::InvalidValue { .. }
        )
    }
}

impl From<CacheError> for StoreError {
    fn from(err: CacheError) -> Self {
        Self::CacheUnavailable(err.to_string())
    }
}

/// Errors raised by the cache port. The coordinator treats every variant the
/// same way: log it, keep going.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("cache command failed: {0}")]
    Command(String),

    #[error("cache payload could not be decoded: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_setting_display() {
        let err = StoreError::unknown_setting("guild", "colour");
        assert_eq!(err.to_string(), "unknown guild setting: colour");
        assert!(err.is_rejection());
    }

    #[test]
    fn test_store_failures_are_not_rejections() {
        assert!(!StoreError::QueryFailed("boom".into()).is_rejection());
        assert!(!StoreError::StoreUnavailable("down".into()).is_rejection());
    }

    #[test]
    fn test_cache_error_converts() {
        let err: StoreError = CacheError::Unavailable("refused".into()).into();
        assert!(matches!(err, StoreError::CacheUnavailable(_)));
    }
}
