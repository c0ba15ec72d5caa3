use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::CacheConfig;
use crate::entry::Entry;

/// Thread-safe in-memory string cache with optional per-entry deadlines
///
/// A single mutex guards the whole map and every operation holds it for its
/// full duration, so calls are linearizable with respect to each other.
/// Reads take the same exclusive lock as writes because [`Cache::get`] and
/// [`Cache::keys`] delete expired entries they come across.
///
/// Expiration is lazy: nothing runs in the background. An expired entry stays
/// in memory until an operation touches it or [`Cache::purge_expired`] is
/// called.
///
/// Cloning a `Cache` yields another handle to the same map. Caches created by
/// separate calls to [`Cache::new`] share nothing.
///
/// # Example
///
/// ```rust
/// use tillcache_core::Cache;
/// use std::time::{Duration, Instant};
///
/// let cache = Cache::new();
/// cache.put("user:123", "John Doe");
/// cache.put_till("session:abc", "token", Instant::now() + Duration::from_secs(300));
///
/// assert_eq!(cache.get("user:123").as_deref(), Some("John Doe"));
/// assert_eq!(cache.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Cache {
    items: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Cache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty cache with custom configuration
    ///
    /// An `initial_capacity` that cannot be reserved is logged and ignored;
    /// the cache then starts empty and grows on demand.
    pub fn with_config(config: CacheConfig) -> Self {
        let mut items = HashMap::new();
        if let Err(err) = items.try_reserve(config.initial_capacity) {
            tracing::warn!(
                capacity = config.initial_capacity,
                error = %err,
                "could not reserve initial capacity, starting with an empty map"
            );
        }

        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }

    /// Acquires the map lock.
    ///
    /// Every mutation is a single map call, so a panic on another thread
    /// cannot leave the map half-updated and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Retrieves a copy of the value stored under `key`
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    /// An expired entry is removed as part of the lookup.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut items = self.lock();
        let now = Instant::now();

        let entry = items.get(key)?;
        if !entry.is_expired_at(now) {
            return Some(entry.value().to_owned());
        }

        items.remove(key);
        tracing::trace!(key, "removed expired entry on read");
        None
    }

    /// Stores a value that never expires, overwriting any previous entry
    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.put_till(key, value, None);
    }

    /// Stores a value that expires once `deadline` has passed
    ///
    /// Passing `None` stores a value that never expires. A deadline that is
    /// already in the past is accepted; the entry is dropped the next time it
    /// is accessed.
    pub fn put_till(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
        deadline: impl Into<Option<Instant>>,
    ) {
        let entry = Entry::new(value, deadline.into());
        self.lock().insert(key.into(), entry);
    }

    /// Stores a value that expires `ttl` from now
    ///
    /// A `ttl` too large to represent as an [`Instant`] is treated as
    /// never expiring.
    pub fn put_for(&self, key: impl Into<String>, value: impl Into<String>, ttl: Duration) {
        self.put_till(key, value, Instant::now().checked_add(ttl));
    }

    /// Returns the keys of all live entries, in no particular order
    ///
    /// Every expired entry met during the scan is removed.
    pub fn keys(&self) -> Vec<String> {
        let mut items = self.lock();
        let now = Instant::now();
        let before = items.len();

        let mut live = Vec::with_capacity(before);
        items.retain(|key, entry| {
            if entry.is_expired_at(now) {
                return false;
            }
            live.push(key.clone());
            true
        });

        let removed = before - items.len();
        if removed > 0 {
            tracing::trace!(removed, "removed expired entries while listing keys");
        }
        live
    }

    /// Checks if a key exists and is not expired
    ///
    /// Expired entries are lazily removed when checked.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        let mut items = self.lock();

        let Some(entry) = items.get(key) else {
            return false;
        };
        if !entry.is_expired() {
            return true;
        }

        items.remove(key);
        tracing::trace!(key, "removed expired entry on lookup");
        false
    }

    /// Removes a key from the cache
    ///
    /// Returns `true` if an entry was present (expired or not).
    #[must_use = "returns whether the key existed"]
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    /// Removes every expired entry and returns how many were removed
    ///
    /// This only runs when called. The cache never sweeps on its own.
    pub fn purge_expired(&self) -> usize {
        let mut items = self.lock();
        let now = Instant::now();
        let before = items.len();

        items.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - items.len();
        tracing::trace!(removed, "purged expired entries");
        removed
    }

    /// Removes all entries and returns how many there were
    pub fn clear(&self) -> usize {
        let mut items = self.lock();
        let count = items.len();
        items.clear();
        count
    }

    /// Returns the number of stored entries, including expired ones that
    /// have not been touched yet
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
