//! Typed Cache Module
//!
//! The generic typed façade over one namespace of entries in a backing
//! store. Applies the key strategy to every logical key, the codec to every
//! payload, and delegates storage to the [`Store`] it was built with.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{Codec, JsonCodec};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::key::{HashedKeys, KeyStrategy, PlainKeys};
use crate::store::Store;

// == Cache ==
/// A typed cache over one namespace of a backing store.
///
/// Construction validates that the element type can be encoded by the codec
/// (using a default-constructed sample) and fails fast if it cannot; the
/// check runs once, never per operation.
///
/// The cache itself holds no entry-level locks: single-key write atomicity
/// is the store's responsibility, and one cache instance may be shared
/// freely across tasks.
pub struct Cache<T, C: Codec = JsonCodec> {
    /// Backing key-value store
    store: Arc<dyn Store>,
    /// Logical-to-physical key derivation
    keys: Box<dyn KeyStrategy>,
    /// Payload codec
    codec: C,
    /// TTL applied by `set` when no explicit expiry is given
    default_ttl: Duration,
    _element: PhantomData<fn() -> T>,
}

impl<T> Cache<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    // == Constructors ==
    /// Creates a cache with plain (normalize + prefix) keys, the JSON codec
    /// and configuration loaded from the environment.
    pub fn new(store: Arc<dyn Store>, prefix: impl Into<String>) -> Result<Self> {
        Self::with_parts(
            store,
            Box::new(PlainKeys::new(prefix)),
            JsonCodec,
            CacheConfig::from_env(),
        )
    }

    /// Creates a cache that digests logical keys before prefixing, for
    /// namespaces where keys may exceed the backend's length limit.
    pub fn hashed(store: Arc<dyn Store>, prefix: impl Into<String>) -> Result<Self> {
        Self::with_parts(
            store,
            Box::new(HashedKeys::new(prefix)),
            JsonCodec,
            CacheConfig::from_env(),
        )
    }
}

impl<T, C> Cache<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    /// Creates a cache from explicit parts.
    ///
    /// Fails with [`CacheError::UnsupportedType`] when the codec cannot
    /// encode a default-constructed sample of the element type.
    pub fn with_parts(
        store: Arc<dyn Store>,
        keys: Box<dyn KeyStrategy>,
        codec: C,
        config: CacheConfig,
    ) -> Result<Self>
    where
        T: Default,
    {
        if !codec.validate(&T::default()) {
            return Err(CacheError::UnsupportedType(
                std::any::type_name::<T>().to_string(),
            ));
        }

        Ok(Self {
            store,
            keys,
            codec,
            default_ttl: config.default_ttl,
            _element: PhantomData,
        })
    }

    /// Returns the TTL applied when `set` is called without an expiry.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Internal Helpers ==
    /// Derives the physical key for a logical key.
    pub(crate) fn physical_key(&self, key: &str) -> String {
        self.keys.transform(key)
    }

    /// Encodes a value with this cache's codec.
    pub(crate) fn encode(&self, value: &T) -> Result<Vec<u8>> {
        self.codec.encode(value)
    }

    /// Decodes a payload with this cache's codec.
    pub(crate) fn decode(&self, payload: &[u8]) -> Result<T> {
        self.codec.decode(payload)
    }

    // == Set ==
    /// Adds or replaces an entry with the default expiry.
    pub async fn set(&self, key: &str, value: &T) -> Result<()> {
        self.set_for(key, value, self.default_ttl).await
    }

    /// Adds or replaces an entry that expires after `ttl`.
    pub async fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let payload = self.encode(value)?;
        self.store.set(&self.physical_key(key), payload, ttl).await
    }

    // == Get ==
    /// Retrieves an entry, or `None` when absent.
    ///
    /// "Never set", "expired" and "removed" are indistinguishable here, by
    /// design; all read back as `None`.
    pub async fn get(&self, key: &str) -> Result<Option<T>> {
        match self.store.get(&self.physical_key(key)).await? {
            Some(payload) => Ok(Some(self.decode(&payload)?)),
            None => Ok(None),
        }
    }

    // == Remove ==
    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.store.remove(&self.physical_key(key)).await
    }

    // == Get Many ==
    /// Retrieves multiple entries in one store round trip.
    ///
    /// The result is keyed by logical key and contains every requested key,
    /// with `None` for absent entries. If the store fails for any key the
    /// whole batch fails; there is no partial result.
    pub async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<T>>> {
        let pairs: Vec<(String, String)> = keys
            .iter()
            .map(|key| (key.to_string(), self.physical_key(key)))
            .collect();
        let physical: Vec<String> = pairs.iter().map(|(_, p)| p.clone()).collect();

        let raw = self.store.get_many(&physical).await?;

        let mut results = HashMap::with_capacity(pairs.len());
        for (logical, physical) in pairs {
            let value = match raw.get(&physical).and_then(|p| p.as_ref()) {
                Some(payload) => Some(self.decode(payload)?),
                None => None,
            };
            results.insert(logical, value);
        }
        Ok(results)
    }
}
