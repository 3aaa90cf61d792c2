//! Stash Cache - a typed caching layer over pluggable key-value stores
//!
//! Provides strongly-typed get/set/remove for single values and batches,
//! optimistic check-and-set concurrency, deterministic key derivation and
//! transparent serialization, all over any backend implementing the
//! [`store::Store`] contract. An in-memory backend with TTL expiry and LRU
//! eviction is included.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use stash_cache::{Cache, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::new(1000));
//! let cache: Cache<Profile> = Cache::new(store, "profiles")?;
//!
//! cache.set("alpha", &profile).await?;
//! let hit = cache.get("alpha").await?;
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod key;
pub mod store;
pub mod tasks;

pub use cache::{
    BlockingCache, BlockingCasCache, BlockingValueCache, Cache, CasCache, CheckResult, ValueCache,
};
pub use codec::{Codec, JsonCodec};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use key::{HashedKeys, KeyStrategy, PlainKeys};
pub use store::{CasStore, MemoryStore, Store, NO_TOKEN};
pub use tasks::spawn_sweeper_task;
