//! Check-And-Set Cache Module
//!
//! Adds optimistic concurrency on top of the typed cache for callers that
//! must guarantee no other writer touched an entry between read and write.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Cache;
use crate::codec::{Codec, JsonCodec};
use crate::config::CacheConfig;
use crate::error::Result;
use crate::key::PlainKeys;
use crate::store::{CasStore, Store};

// == Check Result ==
/// A value read from a CAS cache together with its revision token.
///
/// The token is [`NO_TOKEN`](crate::store::NO_TOKEN) when no entry exists. It is valid only for the
/// exact value observed: a later successful conditional write invalidates
/// it, and a fresh read is needed before the next attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult<T> {
    /// The cached value, `None` when absent
    pub value: Option<T>,
    /// Revision token for a subsequent conditional write
    pub token: u64,
}

impl<T> CheckResult<T> {
    /// Returns true when an entry was present.
    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

// == CAS Cache ==
/// A typed cache whose writes can be made conditional on a revision token.
///
/// All regular operations behave exactly as on [`Cache`]. The conditional
/// write never retries on its own: on a token mismatch it returns `false`
/// and the caller must re-read to obtain a fresh token, which keeps
/// lost-update races explicit instead of silent.
///
/// Constructing with a distinct prefix per cache is strongly recommended to
/// avoid key collisions between namespaces sharing one store.
pub struct CasCache<T, C: Codec = JsonCodec> {
    /// The same store, viewed through its CAS extension
    store: Arc<dyn CasStore>,
    /// The plain typed cache handling non-conditional operations
    inner: Cache<T, C>,
}

impl<T> CasCache<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    // == Constructor ==
    /// Creates a CAS cache with plain keys, the JSON codec and configuration
    /// loaded from the environment.
    pub fn new<S>(store: Arc<S>, prefix: impl Into<String>) -> Result<Self>
    where
        S: CasStore + 'static,
    {
        let prefix = prefix.into();
        let inner = Cache::with_parts(
            store.clone() as Arc<dyn Store>,
            Box::new(PlainKeys::new(prefix)),
            JsonCodec,
            CacheConfig::from_env(),
        )?;

        Ok(Self {
            store: store as Arc<dyn CasStore>,
            inner,
        })
    }
}

impl<T, C> CasCache<T, C>
where
    T: Serialize + DeserializeOwned,
    C: Codec,
{
    // == Plain Operations ==
    /// Adds or replaces an entry unconditionally with the default expiry.
    pub async fn set(&self, key: &str, value: &T) -> Result<()> {
        self.inner.set(key, value).await
    }

    /// Adds or replaces an entry unconditionally, expiring after `ttl`.
    pub async fn set_for(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.inner.set_for(key, value, ttl).await
    }

    /// Retrieves an entry without its token.
    pub async fn get(&self, key: &str) -> Result<Option<T>> {
        self.inner.get(key).await
    }

    /// Removes an entry. Returns true iff an entry existed and was removed.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        self.inner.remove(key).await
    }

    /// Retrieves multiple entries; see [`Cache::get_many`].
    pub async fn get_many(
        &self,
        keys: &[&str],
    ) -> Result<std::collections::HashMap<String, Option<T>>> {
        self.inner.get_many(keys).await
    }

    /// Returns the TTL applied when writes omit an explicit expiry.
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl()
    }

    // == Get With Check ==
    /// Retrieves an entry together with its revision token.
    pub async fn get_with_check(&self, key: &str) -> Result<CheckResult<T>> {
        let physical = self.inner.physical_key(key);
        let (payload, token) = self.store.get_with_token(&physical).await?;

        let value = match payload {
            Some(payload) => Some(self.inner.decode(&payload)?),
            None => None,
        };
        Ok(CheckResult { value, token })
    }

    // == Set If ==
    /// Conditionally replaces an entry with the default expiry.
    ///
    /// Returns true iff the stored token still matched `token` at write
    /// time. Passing [`NO_TOKEN`](crate::store::NO_TOKEN) creates the entry only if none exists.
    /// A mismatch is a normal `false`, not an error.
    pub async fn set_if(&self, key: &str, token: u64, value: &T) -> Result<bool> {
        self.set_if_for(key, token, value, self.inner.default_ttl())
            .await
    }

    /// Conditionally replaces an entry, expiring after `ttl`.
    pub async fn set_if_for(
        &self,
        key: &str,
        token: u64,
        value: &T,
        ttl: Duration,
    ) -> Result<bool> {
        let payload = self.inner.encode(value)?;
        self.store
            .set_if(&self.inner.physical_key(key), token, payload, ttl)
            .await
    }
}
