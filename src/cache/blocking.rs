//! Blocking Cache Module
//!
//! Synchronous wrappers for callers without async/await.
//!
//! Each wrapper owns a dedicated single-threaded runtime and drives the
//! async cache on it, so every blocking call produces exactly the result of
//! its async counterpart; no operation logic is duplicated. Because the
//! runtime is private to the wrapper, blocking waits never share an
//! executor with the operations they wait on.
//!
//! Do not call these methods from inside an async task: blocking a runtime
//! worker thread panics. Use the async [`Cache`]/[`CasCache`] there instead.

use std::collections::HashMap;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::runtime::{Builder, Runtime};

use crate::cache::{Cache, CasCache, CheckResult, ValueCache};
use crate::codec::{Codec, JsonCodec};
use crate::error::{CacheError, Result};

/// Builds the private runtime a blocking wrapper drives its cache with.
fn blocking_runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CacheError::Internal(format!("failed to build runtime: {}", e)))
}

// == Blocking Cache ==
/// Synchronous wrapper around [`Cache`].
pub struct BlockingCache<T, C: Codec = JsonCodec> {
    inner: Cache<T, C>,
    runtime: Runtime,
}

impl<T, C> BlockingCache<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    // == Constructor ==
    /// Wraps an async cache with a dedicated runtime.
    pub fn new(inner: Cache<T, C>) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: blocking_runtime()?,
        })
    }

    /// Returns the wrapped async cache.
    pub fn as_async(&self) -> &Cache<T, C> {
        &self.inner
    }

    // == Operations ==
    /// Adds or replaces an entry with the default expiry.
    pub fn set(&self, key: &str, value: &T) -> Result<()> {
        self.runtime.block_on(self.inner.set(key, value))
    }

    /// Adds or replaces an entry that expires after `ttl`.
    pub fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.runtime.block_on(self.inner.set_for(key, value, ttl))
    }

    /// Retrieves an entry, or `None` when absent.
    pub fn get(&self, key: &str) -> Result<Option<T>> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.remove(key))
    }

    /// Retrieves multiple entries; see [`Cache::get_many`].
    pub fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<T>>> {
        self.runtime.block_on(self.inner.get_many(keys))
    }
}

// == Blocking CAS Cache ==
/// Synchronous wrapper around [`CasCache`].
pub struct BlockingCasCache<T, C: Codec = JsonCodec> {
    inner: CasCache<T, C>,
    runtime: Runtime,
}

impl<T, C> BlockingCasCache<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    // == Constructor ==
    /// Wraps an async CAS cache with a dedicated runtime.
    pub fn new(inner: CasCache<T, C>) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: blocking_runtime()?,
        })
    }

    /// Returns the wrapped async cache.
    pub fn as_async(&self) -> &CasCache<T, C> {
        &self.inner
    }

    // == Operations ==
    /// Adds or replaces an entry unconditionally with the default expiry.
    pub fn set(&self, key: &str, value: &T) -> Result<()> {
        self.runtime.block_on(self.inner.set(key, value))
    }

    /// Adds or replaces an entry unconditionally, expiring after `ttl`.
    pub fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.runtime.block_on(self.inner.set_for(key, value, ttl))
    }

    /// Retrieves an entry without its token.
    pub fn get(&self, key: &str) -> Result<Option<T>> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.remove(key))
    }

    /// Retrieves multiple entries; see [`Cache::get_many`].
    pub fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Option<T>>> {
        self.runtime.block_on(self.inner.get_many(keys))
    }

    /// Retrieves an entry together with its revision token.
    pub fn get_with_check(&self, key: &str) -> Result<CheckResult<T>> {
        self.runtime.block_on(self.inner.get_with_check(key))
    }

    /// Conditionally replaces an entry; see [`CasCache::set_if`].
    pub fn set_if(&self, key: &str, token: u64, value: &T) -> Result<bool> {
        self.runtime.block_on(self.inner.set_if(key, token, value))
    }

    /// Conditionally replaces an entry, expiring after `ttl`.
    pub fn set_if_for(&self, key: &str, token: u64, value: &T, ttl: Duration) -> Result<bool> {
        self.runtime
            .block_on(self.inner.set_if_for(key, token, value, ttl))
    }
}

// == Blocking Value Cache ==
/// Synchronous wrapper around [`ValueCache`].
pub struct BlockingValueCache<T, C: Codec = JsonCodec> {
    inner: ValueCache<T, C>,
    runtime: Runtime,
}

impl<T, C> BlockingValueCache<T, C>
where
    T: Serialize + DeserializeOwned + Default,
    C: Codec,
{
    // == Constructor ==
    /// Wraps an async value cache with a dedicated runtime.
    pub fn new(inner: ValueCache<T, C>) -> Result<Self> {
        Ok(Self {
            inner,
            runtime: blocking_runtime()?,
        })
    }

    /// Returns the wrapped async cache.
    pub fn as_async(&self) -> &ValueCache<T, C> {
        &self.inner
    }

    // == Operations ==
    /// Adds or replaces an entry with the default expiry.
    pub fn set(&self, key: &str, value: &T) -> Result<()> {
        self.runtime.block_on(self.inner.set(key, value))
    }

    /// Adds or replaces an entry that expires after `ttl`.
    pub fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.runtime.block_on(self.inner.set_for(key, value, ttl))
    }

    /// Retrieves an entry, or `T::default()` when absent.
    pub fn get(&self, key: &str) -> Result<T> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        self.runtime.block_on(self.inner.remove(key))
    }

    /// Retrieves multiple entries, absent ones as `T::default()`.
    pub fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, T>> {
        self.runtime.block_on(self.inner.get_many(keys))
    }
}
