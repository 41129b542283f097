//! In-memory response cache with per-entry TTL
//!
//! Stores raw serialized response bodies keyed by a canonical string derived
//! from the request path and query parameters. Entries expire lazily when
//! read past their TTL.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// A single cached response body with its expiry time
struct CacheEntry {
    /// The raw response body as it was received from upstream
    body: String,
    /// Point in time after which the entry must not be served
    expires_at: Instant,
}

/// Thread-safe in-memory cache with per-entry TTL expiration
///
/// Entries are exclusively owned by the cache; `get` hands out a copy of the
/// stored body. Concurrent `get`/`put` calls from overlapping requests are
/// serialized by an interior lock, which is all the atomicity the request
/// path needs (no cross-key guarantees).
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached body for `key` if present and not expired
    ///
    /// An expired entry is removed on sight and reported as absent. Absence
    /// is not an error; callers fall through to the network.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `body` under `key`, overwriting any existing entry
    ///
    /// The entry becomes eligible for hits until `ttl` from now.
    pub fn put(&self, key: &str, body: impl Into<String>, ttl: Duration) {
        let entry = CacheEntry {
            body: body.into(),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), entry);
    }

    /// Drops all entries
    ///
    /// Used for test isolation; not part of the steady-state request path.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Removes every expired entry
    ///
    /// Lazy expiry in `get` already keeps correctness; this bounds memory in
    /// long-lived processes where keys stop being requested.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, entry| entry.expires_at > now);
    }

    /// Number of entries currently held, expired or not
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache currently holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the canonical cache key for a request path and its query parameters
///
/// Parameters are sorted by name (then value) before joining, so equivalent
/// queries submitted in any parameter order collide to the same key. The
/// upstream credential is injected after key construction and must never be
/// passed in here.
pub fn response_cache_key(path: &str, params: &[(&str, &str)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }

    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_unstable();

    let query = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", path, query)
}
