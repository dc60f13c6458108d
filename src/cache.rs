//! Read-only API response cache (spec §4.2 "Cache").
//!
//! Grounded in the teacher's in-process LRU usage in `github/client.rs`
//! (there it caches parsed team data; here it caches read-only REST/GraphQL
//! responses keyed by method name plus sorted parameters). Only read
//! operations are cached; writes always hit the network and must not be
//! served stale.

use std::collections::HashMap;

use serde_json::Value;

/// Builds a stable cache key from a method name and its parameters.
/// Parameters are sorted by key so that call-site argument order never
/// affects cache hits.
pub fn cache_key(method_name: &str, params: &[(&str, &str)]) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{method_name}:{joined}")
}

/// A pluggable cache for read-only API responses.
pub trait ApiCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn put(&self, key: &str, value: Value);
}

/// Simple unsynchronized in-memory cache, good for the lifetime of a single
/// save or restore run. Not shared across threads: the orchestrator drives
/// one entity at a time (spec §5), so nothing in this engine needs a
/// concurrent map.
#[derive(Default)]
pub struct InMemoryCache {
    entries: std::sync::Mutex<HashMap<String, Value>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache::default()
    }
}

impl ApiCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

/// A cache that never stores anything; useful for tests that want to assert
/// on request counts without cache interference.
#[derive(Default)]
pub struct NullCache;

impl ApiCache for NullCache {
    fn get(&self, _key: &str) -> Option<Value> {
        None
    }

    fn put(&self, _key: &str, _value: Value) {}
}
