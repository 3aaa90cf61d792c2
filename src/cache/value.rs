//! Value Cache Module
//!
//! A specialist cache for value types such as counters and flags.
//!
//! Reads conflate "absent" with the type's default value: an unset key and
//! a key set to `T::default()` are observably identical. This matches what
//! value-type callers almost always want (a missing counter is zero) and is
//! a deliberate semantic, not a gap; callers that need to distinguish the
//! two cases should use [`Cache`] and inspect the `Option`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Cache;
use crate::codec::{Codec, JsonCodec};
use crate::error::Result;
use crate::store::Store;

// == Value Cache ==
/// A typed cache whose reads fall back to `T::default()` when absent.
///
/// Constructing with a distinct prefix per cache is strongly recommended to
/// avoid key collisions between namespaces sharing one store.
pub struct ValueCache<T, C: Codec = JsonCodec> {
    inner: Cache<T, C>,
}

impl<T> ValueCache<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    // == Constructor ==
    /// Creates a value cache with plain keys and the JSON codec.
    pub fn new(store: Arc<dyn Store>, prefix: impl Into<String>) -> Result<Self> {
        Ok(Self {
            inner: Cache::new(store, prefix)?,
        })
    }
}

impl<T, C> ValueCache<T, C>
where
    T: Serialize + DeserializeOwned + Default,
    C: Codec,
{
    // == Set ==
    /// Adds or replaces an entry with the default expiry.
    pub async fn set(&self, key: &str, value: &T) -> Result<()> {
        self.inner.set(key, value).await
    }

    /// Adds or replaces an entry that expires after `ttl`.
    pub async fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.inner.set_for(key, value, ttl).await
    }

    // == Get ==
    /// Retrieves an entry, or `T::default()` when absent.
    pub async fn get(&self, key: &str) -> Result<T> {
        Ok(self.inner.get(key).await?.unwrap_or_default())
    }

    // == Remove ==
    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.inner.remove(key).await
    }

    // == Get Many ==
    /// Retrieves multiple entries, absent ones as `T::default()`.
    ///
    /// Every requested key appears in the result.
    pub async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, T>> {
        let results = self.inner.get_many(keys).await?;
        Ok(results
            .into_iter()
            .map(|(key, value)| (key, value.unwrap_or_default()))
            .collect())
    }

    /// Returns the TTL applied when `set` is called without an expiry.
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn test_cache() -> ValueCache<u64> {
        ValueCache::new(Arc::new(MemoryStore::new(100)), "hits").unwrap()
    }

    #[tokio::test]
    async fn test_unset_key_reads_as_default() {
        let cache = test_cache();
        assert_eq!(cache.get("never-set").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_default_value_conflation() {
        let cache = test_cache();

        // Unset and explicitly-zero keys are observably identical
        let before = cache.get("k").await.unwrap();
        cache.set("k", &0).await.unwrap();
        let after = cache.get("k").await.unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = test_cache();
        cache.set("views", &42).await.unwrap();
        assert_eq!(cache.get("views").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_remove_falls_back_to_default() {
        let cache = test_cache();
        cache.set("views", &42).await.unwrap();

        assert!(cache.remove("views").await.unwrap());
        assert_eq!(cache.get("views").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_many_fills_defaults() {
        let cache = test_cache();
        cache.set("a", &1).await.unwrap();

        let results = cache.get_many(&["a", "b"]).await.unwrap();
        assert_eq!(results["a"], 1);
        assert_eq!(results["b"], 0);
        assert_eq!(results.len(), 2);
    }
}
