//! Store Module
//!
//! The boundary between the typed cache layer and a backing key-value
//! service. The cache core speaks to any backend through the [`Store`]
//! trait (and [`CasStore`] for check-and-set support); payloads are opaque
//! bytes, and serialization stays in the cache layer.
//!
//! Ships with [`MemoryStore`], an embedded implementation with TTL expiry
//! and LRU capacity eviction, used as the reference backend and in tests.

mod entry;
mod memory;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// Re-export public types
pub use entry::StoreEntry;
pub use memory::MemoryStore;

// == Public Constants ==
/// Token value denoting "no entry exists" in check-and-set operations.
pub const NO_TOKEN: u64 = 0;

/// Maximum physical key length accepted by the bundled store, matching the
/// historic memcached limit (prefix included).
pub const MAX_KEY_LENGTH: usize = 250;

/// Maximum payload size in bytes accepted by the bundled store.
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024; // 1 MB

// == Store Trait ==
/// Minimal contract the cache core needs from a backing key-value service.
///
/// Implementations are assumed non-blocking internally. Expiry enforcement
/// belongs to the store: a read after an entry's TTL has elapsed must behave
/// exactly like a read of a key that was never set. Any connection resource
/// is released when the implementation is dropped.
#[async_trait]
pub trait Store: Send + Sync {
    /// Stores a payload under a key, replacing any previous entry atomically.
    async fn set(&self, key: &str, payload: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Retrieves the payload for a key, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Retrieves payloads for multiple keys.
    ///
    /// The result must contain an entry for every requested key, with
    /// `None` for keys that are absent; no key may be omitted.
    async fn get_many(&self, keys: &[String]) -> Result<HashMap<String, Option<Vec<u8>>>>;

    /// Removes an entry. Returns true iff an entry existed and was removed.
    async fn remove(&self, key: &str) -> Result<bool>;
}

// == CAS Store Trait ==
/// A store that additionally supports check-and-set writes.
///
/// Tokens are opaque, store-assigned revision markers. [`NO_TOKEN`] denotes
/// "no entry exists". The compare step of [`CasStore::set_if`] must be atomic
/// relative to concurrent writers of the same key.
#[async_trait]
pub trait CasStore: Store {
    /// Writes the payload only if the stored token matches `expected`.
    ///
    /// Returns true iff the write happened. When no entry exists and
    /// `expected` is [`NO_TOKEN`], the write succeeds and creates the entry.
    /// A token mismatch returns false, not an error.
    async fn set_if(
        &self,
        key: &str,
        expected: u64,
        payload: Vec<u8>,
        ttl: Duration,
    ) -> Result<bool>;

    /// Retrieves the payload for a key together with its current token.
    ///
    /// The token is [`NO_TOKEN`] when the payload is `None`.
    async fn get_with_token(&self, key: &str) -> Result<(Option<Vec<u8>>, u64)>;
}
