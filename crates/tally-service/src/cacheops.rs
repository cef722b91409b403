//! Cache-aside primitives
//!
//! The helpers here encode the coordinator's two rules:
//!
//! 1. The cache never decides an operation's outcome. Reads treat any cache
//!    failure (or undecodable payload) as a miss; writes log failures and move
//!    on.
//! 2. Read-path population is fire-and-forget: the caller gets the database
//!    result as soon as it exists, and the cache fill runs on a detached task.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use tally_core::traits::{CacheResult, FastCache};

/// Await a best-effort cache step, swallowing (and logging) failure
pub(crate) async fn best_effort<T>(key: &str, op: impl Future<Output = CacheResult<T>>) {
    if let Err(e) = op.await {
        warn!(key = %key, error = %e, "cache write failed; continuing");
    }
}

/// Populate a hash off the critical path
pub(crate) fn spawn_fill_hash(
    cache: Arc<dyn FastCache>,
    key: String,
    fields: Vec<(&'static str, String)>,
) {
    tokio::spawn(async move {
        best_effort(&key, cache.hash_set(&key, &fields)).await;
    });
}

/// Populate a string key off the critical path
pub(crate) fn spawn_fill_string(
    cache: Arc<dyn FastCache>,
    key: String,
    payload: String,
    ttl_seconds: Option<u64>,
) {
    tokio::spawn(async move {
        best_effort(&key, cache.set_string(&key, &payload, ttl_seconds)).await;
    });
}

/// Populate a set off the critical path
pub(crate) fn spawn_fill_set(cache: Arc<dyn FastCache>, key: String, members: Vec<String>) {
    tokio::spawn(async move {
        for member in &members {
            best_effort(&key, cache.set_add(&key, member)).await;
        }
    });
}

/// Read a hash, treating failures as a miss. An empty map is also a miss:
/// hash entries are only ever written whole, so presence of any field marks a
/// hit.
pub(crate) async fn read_hash(
    cache: &dyn FastCache,
    key: &str,
) -> Option<HashMap<String, String>> {
    match cache.hash_get_all(key).await {
        Ok(map) if map.is_empty() => None,
        Ok(map) => Some(map),
        Err(e) => {
            warn!(key = %key, error = %e, "cache read failed; treating as miss");
            None
        }
    }
}

/// Read and decode a JSON value, treating failures and undecodable payloads
/// as a miss
pub(crate) async fn read_json<T: DeserializeOwned>(cache: &dyn FastCache, key: &str) -> Option<T> {
    let payload = match cache.get_string(key).await {
        Ok(payload) => payload?,
        Err(e) => {
            warn!(key = %key, error = %e, "cache read failed; treating as miss");
            return None;
        }
    };
    match serde_json::from_str(&payload) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key = %key, error = %e, "cache payload undecodable; treating as miss");
            None
        }
    }
}

/// Encode a value and populate a string key off the critical path
pub(crate) fn spawn_fill_json<T: Serialize>(
    cache: Arc<dyn FastCache>,
    key: String,
    value: &T,
    ttl_seconds: Option<u64>,
) {
    match serde_json::to_string(value) {
        Ok(payload) => spawn_fill_string(cache, key, payload, ttl_seconds),
        Err(e) => warn!(key = %key, error = %e, "cache payload unencodable; skipping fill"),
    }
}

/// Patch a cached JSON list in place, wholesale.
///
/// Only applies when the key already holds a list; an absent key is left
/// absent rather than materialized from a single element, since that would
/// silently diverge from the database's full contents. An undecodable payload
/// is deleted so the next read repopulates from the database.
pub(crate) async fn patch_json_list<T, F>(cache: &dyn FastCache, key: &str, patch: F)
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>),
{
    let payload = match cache.get_string(key).await {
        Ok(Some(payload)) => payload,
        Ok(None) => return,
        Err(e) => {
            warn!(key = %key, error = %e, "cache read failed; skipping patch");
            return;
        }
    };

    let mut list: Vec<T> = match serde_json::from_str(&payload) {
        Ok(list) => list,
        Err(e) => {
            warn!(key = %key, error = %e, "cache payload undecodable; invalidating");
            best_effort(key, cache.delete(key)).await;
            return;
        }
    };

    patch(&mut list);

    match serde_json::to_string(&list) {
        Ok(updated) => best_effort(key, cache.set_string(key, &updated, None)).await,
        Err(e) => warn!(key = %key, error = %e, "cache payload unencodable; skipping patch"),
    }
}

/// Delete a key, best-effort
pub(crate) async fn invalidate(cache: &dyn FastCache, key: &str) {
    best_effort(key, cache.delete(key)).await;
}
