//! Model to entity mappers
//!
//! Conversions from database rows to domain objects. Conversions that have to
//! re-validate stored text (storage ids, kind tags) are `TryFrom` and report
//! corruption as `StoreError::QueryFailed`; the rest are plain `From`.

mod alert;
mod event;
mod guild;
mod member;
mod payment;
mod plugin;
mod storage;
mod subscription;
