//! Typed cache over a [`KeyValueStore`] with automatic JSON serialization.

use crate::store::{FileStore, KeyValueStore, MemoryStore};
use crate::{CacheError, Expiring};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Type-safe cache.
///
/// Cloning is cheap; clones share the same store.
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl Cache {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Session-scoped cache that lives in memory.
    pub fn memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Persistent cache in a JSON file.
    ///
    /// ```rust,ignore
    /// let local = Cache::open_file(dir.join("local.json"))?;
    /// ```
    pub fn open_file(path: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(path)?))
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get_raw(key)? {
            Some(text) => {
                let value: T = serde_json::from_str(&text)?;
                tracing::trace!(key, "cache hit");
                Ok(Some(value))
            }
            None => {
                tracing::trace!(key, "cache miss");
                Ok(None)
            }
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let text = serde_json::to_string(value)?;
        self.store.set_raw(key, text)
    }

    /// Delete a value. Returns whether it existed.
    pub fn delete(&self, key: &str) -> Result<bool, CacheError> {
        self.store.delete(key)
    }

    /// Get and delete a value.
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let value = self.get(key)?;
        if value.is_some() {
            self.store.delete(key)?;
        }
        Ok(value)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.store.get_raw(key)?.is_some())
    }

    /// Get all keys, optionally restricted to a `prefix:` namespace.
    pub fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>, CacheError> {
        let keys = self.store.keys()?;
        Ok(match prefix {
            Some(prefix) => {
                let namespace = format!("{prefix}:");
                keys.into_iter().filter(|k| k.starts_with(&namespace)).collect()
            }
            None => keys,
        })
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        self.store.clear()
    }

    /// Store a value that goes stale after `ttl`.
    pub fn set_expiring<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        self.set(key, &Expiring::new(value, ttl, now))
    }

    /// Get a value stored with [`Cache::set_expiring`] if still fresh at `now`.
    ///
    /// Stale and unreadable entries are removed.
    pub fn get_fresh<T: DeserializeOwned>(
        &self,
        key: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<T>, CacheError> {
        let entry: Option<Expiring<T>> = match self.get(key) {
            Ok(entry) => entry,
            Err(CacheError::SerializeError(e)) => {
                tracing::warn!(key, error = %e, "dropping unreadable cache entry");
                self.store.delete(key)?;
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match entry {
            Some(entry) if entry.is_fresh_at(now) => Ok(Some(entry.value)),
            Some(_) => {
                tracing::debug!(key, "cache entry expired");
                self.store.delete(key)?;
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("cart", customer_id);
/// // Returns "cart:42"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Listing {
        ids: Vec<u32>,
    }

    fn at(minutes: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::minutes(minutes)
    }

    #[test]
    fn test_typed_round_trip() {
        let cache = Cache::memory();
        let listing = Listing { ids: vec![1, 2, 3] };
        cache.set("catalog:products", &listing).unwrap();

        assert_eq!(cache.get::<Listing>("catalog:products").unwrap(), Some(listing));
        assert!(cache.exists("catalog:products").unwrap());
        assert_eq!(cache.get::<Listing>("nope").unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_error() {
        let cache = Cache::memory();
        cache.set("k", "text").unwrap();
        assert!(matches!(
            cache.get::<Listing>("k"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_take_removes() {
        let cache = Cache::memory();
        cache.set("cart:guest", &vec![1, 2]).unwrap();
        assert_eq!(cache.take::<Vec<i32>>("cart:guest").unwrap(), Some(vec![1, 2]));
        assert!(!cache.exists("cart:guest").unwrap());
    }

    #[test]
    fn test_keys_by_prefix() {
        let cache = Cache::memory();
        cache.set("cart:guest", &1).unwrap();
        cache.set("catalog:products", &2).unwrap();
        cache.set("cartel", &3).unwrap();
        assert_eq!(cache.keys(Some("cart")).unwrap(), vec!["cart:guest"]);
        assert_eq!(cache.keys(None).unwrap().len(), 3);
    }

    #[test]
    fn test_clones_share_store() {
        let cache = Cache::memory();
        let other = cache.clone();
        other.set("auth:session", &"token").unwrap();
        assert!(cache.exists("auth:session").unwrap());
    }

    #[test]
    fn test_expiring_entries() {
        let cache = Cache::memory();
        let listing = Listing { ids: vec![7] };
        cache
            .set_expiring("catalog:products", &listing, Duration::minutes(5), at(0))
            .unwrap();

        assert_eq!(
            cache.get_fresh::<Listing>("catalog:products", at(4)).unwrap(),
            Some(listing)
        );
        assert_eq!(cache.get_fresh::<Listing>("catalog:products", at(6)).unwrap(), None);
        assert!(!cache.exists("catalog:products").unwrap(), "stale entry removed");
    }

    #[test]
    fn test_get_fresh_drops_unreadable_entry() {
        let cache = Cache::memory();
        cache.set("catalog:products", &"legacy").unwrap();
        assert_eq!(cache.get_fresh::<Listing>("catalog:products", at(0)).unwrap(), None);
        assert!(!cache.exists("catalog:products").unwrap());
    }

    #[test]
    fn test_cache_key_macro() {
        assert_eq!(cache_key!("cart", 42), "cart:42");
        assert_eq!(cache_key!("catalog", "category", "anillos"), "catalog:category:anillos");
    }
}
