//! In-Memory Store Module
//!
//! An embedded [`Store`]/[`CasStore`] backend combining HashMap storage with
//! LRU capacity eviction and TTL expiration. Serves as the reference
//! implementation and the backend for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::store::entry::StoreEntry;
use crate::store::{CasStore, Store, MAX_KEY_LENGTH, MAX_PAYLOAD_SIZE, NO_TOKEN};

// == Memory Store ==
/// Thread-safe in-memory key-value store with TTL and LRU eviction.
///
/// Revision tokens are minted from a store-wide monotonic counter, so a
/// successful write always invalidates every previously observed token for
/// that key. Expired entries are dropped lazily on access; a background
/// sweep is available via [`cleanup_expired`](MemoryStore::cleanup_expired)
/// and [`crate::tasks::spawn_sweeper_task`].
#[derive(Debug)]
pub struct MemoryStore {
    /// Entries and access order, guarded by one lock
    inner: RwLock<Inner>,
    /// Monotonic revision counter; 0 is reserved for "no entry"
    next_token: AtomicU64,
    /// Maximum number of entries before LRU eviction kicks in
    max_entries: usize,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, StoreEntry>,
    /// Logical clock stamped onto entries on every use; the entry carrying
    /// the lowest stamp is the eviction victim
    use_clock: u64,
}

impl Inner {
    /// Returns the live entry for a key, lazily dropping it if expired.
    ///
    /// A hit counts as a use for LRU purposes.
    fn lookup(&mut self, key: &str) -> Option<&StoreEntry> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }

        self.use_clock += 1;
        let entry = self.entries.get_mut(key)?;
        entry.last_used = self.use_clock;
        self.entries.get(key)
    }

    /// Inserts an entry, evicting the LRU victim when at capacity.
    fn insert(&mut self, key: &str, mut entry: StoreEntry, max_entries: usize) {
        if !self.entries.contains_key(key) && self.entries.len() >= max_entries {
            if let Some(victim) = self.coldest_key() {
                self.entries.remove(&victim);
                debug!(key = %victim, "capacity eviction");
            }
        }
        self.use_clock += 1;
        entry.last_used = self.use_clock;
        self.entries.insert(key.to_string(), entry);
    }

    /// Picks the least recently used key.
    fn coldest_key(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone())
    }
}

impl MemoryStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            next_token: AtomicU64::new(0),
            max_entries,
        }
    }

    /// Mints a fresh, never-before-issued revision token.
    fn mint_token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Validates a key and payload against the store limits.
    fn check_limits(key: &str, payload: &[u8]) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(CacheError::Store(format!(
                "Payload exceeds maximum size of {} bytes",
                MAX_PAYLOAD_SIZE
            )));
        }
        Ok(())
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub async fn cleanup_expired(&self) -> usize {
        let mut inner = self.inner.write().await;

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            inner.entries.remove(key);
        }

        expired_keys.len()
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(1000)
    }
}

// == Store Implementation ==
#[async_trait]
impl Store for MemoryStore {
    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()> {
        Self::check_limits(key, &payload)?;

        let entry = StoreEntry::new(payload, ttl, self.mint_token());
        let mut inner = self.inner.write().await;
        inner.insert(key, entry, self.max_entries);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().await;
        Ok(inner.lookup(key).map(|entry| entry.payload.clone()))
    }

    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>> {
        let mut inner = self.inner.write().await;

        let mut results = HashMap::with_capacity(keys.len());
        for key in keys {
            let payload = inner.lookup(key).map(|entry| entry.payload.clone());
            results.insert(key.clone(), payload);
        }
        Ok(results)
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        match inner.entries.remove(key) {
            // removing an already-expired entry reads as "nothing there"
            Some(entry) => Ok(!entry.is_expired()),
            None => Ok(false),
        }
    }
}

// == CAS Store Implementation ==
#[async_trait]
impl CasStore for MemoryStore {
    async fn set_if(
        &self,
        key: &str,
        expected: u64,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<bool> {
        Self::check_limits(key, &payload)?;

        let mut inner = self.inner.write().await;
        let current = inner
            .lookup(key)
            .map(|entry| entry.token)
            .unwrap_or(NO_TOKEN);

        if current != expected {
            debug!(key, expected, current, "check-and-set token mismatch");
            return Ok(false);
        }

        let entry = StoreEntry::new(payload, ttl, self.mint_token());
        inner.insert(key, entry, self.max_entries);
        Ok(true)
    }

    async fn get_with_token(&self, key: &str) -> Result<(Option<Vec<u8>>, u64)> {
        let mut inner = self.inner.write().await;
        match inner.lookup(key) {
            Some(entry) => Ok((Some(entry.payload.clone()), entry.token)),
            None => Ok((None, NO_TOKEN)),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new(100);

        store.set("key1", b"value1".to_vec(), TTL).await.unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::new(100);
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = MemoryStore::new(100);

        store.set("key1", b"value1".to_vec(), TTL).await.unwrap();
        store.set("key1", b"value2".to_vec(), TTL).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = MemoryStore::new(100);

        store.set("key1", b"value1".to_vec(), TTL).await.unwrap();
        assert!(store.remove("key1").await.unwrap());
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_nonexistent_returns_false() {
        let store = MemoryStore::new(100);
        assert!(!store.remove("nonexistent").await.unwrap());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemoryStore::new(100);

        store
            .set("key1", b"value1".to_vec(), Duration::from_millis(50))
            .await
            .unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_expired_entry_returns_false() {
        let store = MemoryStore::new(100);

        store
            .set("key1", b"value1".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert!(!store.remove("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_lru_eviction_at_capacity() {
        let store = MemoryStore::new(3);

        store.set("key1", b"v1".to_vec(), TTL).await.unwrap();
        store.set("key2", b"v2".to_vec(), TTL).await.unwrap();
        store.set("key3", b"v3".to_vec(), TTL).await.unwrap();

        // Full; inserting key4 evicts key1 (oldest)
        store.set("key4", b"v4".to_vec(), TTL).await.unwrap();

        assert_eq!(store.len().await, 3);
        assert_eq!(store.get("key1").await.unwrap(), None);
        assert!(store.get("key4").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lru_touch_on_get() {
        let store = MemoryStore::new(3);

        store.set("key1", b"v1".to_vec(), TTL).await.unwrap();
        store.set("key2", b"v2".to_vec(), TTL).await.unwrap();
        store.set("key3", b"v3".to_vec(), TTL).await.unwrap();

        // key1 becomes most recent, so key2 is the next victim
        store.get("key1").await.unwrap();
        store.set("key4", b"v4".to_vec(), TTL).await.unwrap();

        assert!(store.get("key1").await.unwrap().is_some());
        assert_eq!(store.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_lru_touch_on_overwrite() {
        let store = MemoryStore::new(3);

        store.set("key1", b"v1".to_vec(), TTL).await.unwrap();
        store.set("key2", b"v2".to_vec(), TTL).await.unwrap();
        store.set("key3", b"v3".to_vec(), TTL).await.unwrap();

        // Overwriting key1 refreshes its recency, so key2 is the victim
        store.set("key1", b"v1b".to_vec(), TTL).await.unwrap();
        store.set("key4", b"v4".to_vec(), TTL).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"v1b".to_vec()));
        assert_eq!(store.get("key2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_many_returns_every_requested_key() {
        let store = MemoryStore::new(100);

        store.set("key1", b"v1".to_vec(), TTL).await.unwrap();
        store.set("key3", b"v3".to_vec(), TTL).await.unwrap();

        let keys = vec![
            "key1".to_string(),
            "key2".to_string(),
            "key3".to_string(),
        ];
        let results = store.get_many(&keys).await.unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results["key1"], Some(b"v1".to_vec()));
        assert_eq!(results["key2"], None);
        assert_eq!(results["key3"], Some(b"v3".to_vec()));
    }

    #[tokio::test]
    async fn test_key_too_long_rejected() {
        let store = MemoryStore::new(100);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let result = store.set(&long_key, b"v".to_vec(), TTL).await;
        assert!(matches!(result, Err(CacheError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_payload_too_large_rejected() {
        let store = MemoryStore::new(100);
        let payload = vec![0u8; MAX_PAYLOAD_SIZE + 1];

        let result = store.set("key", payload, TTL).await;
        assert!(matches!(result, Err(CacheError::Store(_))));
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let store = MemoryStore::new(100);

        store
            .set("short", b"v".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        store.set("long", b"v".to_vec(), TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(store.cleanup_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("long").await.unwrap().is_some());
    }

    // == CAS Tests ==

    #[tokio::test]
    async fn test_cas_create_with_no_token() {
        let store = MemoryStore::new(100);

        let created = store
            .set_if("key1", NO_TOKEN, b"v1".to_vec(), TTL)
            .await
            .unwrap();
        assert!(created);
        assert_eq!(store.get("key1").await.unwrap(), Some(b"v1".to_vec()));
    }

    #[tokio::test]
    async fn test_cas_stale_token_fails() {
        let store = MemoryStore::new(100);

        assert!(store
            .set_if("key1", NO_TOKEN, b"v1".to_vec(), TTL)
            .await
            .unwrap());

        // NO_TOKEN is now stale: an entry exists
        let second = store
            .set_if("key1", NO_TOKEN, b"v2".to_vec(), TTL)
            .await
            .unwrap();
        assert!(!second);
        assert_eq!(store.get("key1").await.unwrap(), Some(b"v1".to_vec()));
    }

    #[tokio::test]
    async fn test_cas_token_chain() {
        let store = MemoryStore::new(100);

        assert!(store
            .set_if("key1", NO_TOKEN, b"v1".to_vec(), TTL)
            .await
            .unwrap());

        let (payload, token1) = store.get_with_token("key1").await.unwrap();
        assert_eq!(payload, Some(b"v1".to_vec()));
        assert_ne!(token1, NO_TOKEN);

        // A matching token wins and mints a new one
        assert!(store
            .set_if("key1", token1, b"v2".to_vec(), TTL)
            .await
            .unwrap());

        let (payload, token2) = store.get_with_token("key1").await.unwrap();
        assert_eq!(payload, Some(b"v2".to_vec()));
        assert_ne!(token2, token1);

        // The consumed token is no longer valid
        assert!(!store
            .set_if("key1", token1, b"v3".to_vec(), TTL)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_cas_nonzero_token_on_absent_key_fails() {
        let store = MemoryStore::new(100);
        assert!(!store.set_if("ghost", 42, b"v".to_vec(), TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_cas_expired_entry_reads_as_absent() {
        let store = MemoryStore::new(100);

        store
            .set("key1", b"v1".to_vec(), Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let (payload, token) = store.get_with_token("key1").await.unwrap();
        assert_eq!(payload, None);
        assert_eq!(token, NO_TOKEN);

        // ...and can be recreated with NO_TOKEN
        assert!(store
            .set_if("key1", NO_TOKEN, b"v2".to_vec(), TTL)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        use std::sync::Arc;

        let store = Arc::new(MemoryStore::new(10_000));
        let mut handles = vec![];

        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for j in 0..100 {
                    let key = format!("key_{}_{}", i, j);
                    let value = format!("value_{}_{}", i, j).into_bytes();
                    store.set(&key, value.clone(), TTL).await.unwrap();
                    assert_eq!(store.get(&key).await.unwrap(), Some(value));
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
