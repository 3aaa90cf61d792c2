//! Key Strategy Module
//!
//! Maps caller-supplied logical keys to backend-safe physical keys.
//!
//! Strategies are pure functions of their inputs: the same (prefix, strategy,
//! logical key) always yields the same physical key, across calls and across
//! process restarts. Strategies accept any string, including the empty string
//! and strings containing the separator character. A logical key that itself
//! contains the separator can collide with the namespace boundary; this is an
//! accepted, documented risk rather than a fault.

use md5::{Digest, Md5};

// == Public Constants ==
/// Separator between the namespace prefix and the normalized key.
pub const KEY_SEPARATOR: char = '$';

// == Key Strategy Trait ==
/// Derives a physical key from a logical key, deterministically and without I/O.
pub trait KeyStrategy: Send + Sync {
    /// Transforms a logical key into a backend-safe physical key.
    fn transform(&self, key: &str) -> String;
}

// == Plain Keys ==
/// Prefixes and normalizes keys without hashing.
///
/// Physical form: `lower(prefix + "$" + replace(key, " ", "_"))`.
///
/// Use when logical keys are short and human-readable entries are desired
/// when inspecting the raw store. Keys longer than the backend's limit are
/// passed through unchanged and may be rejected by the store.
#[derive(Debug, Clone)]
pub struct PlainKeys {
    /// Namespace prefix for all keys produced by this strategy
    prefix: String,
}

impl PlainKeys {
    /// Creates a plain key strategy for the given namespace prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl KeyStrategy for PlainKeys {
    fn transform(&self, key: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix,
            KEY_SEPARATOR,
            key.replace(' ', "_")
        )
        .to_lowercase()
    }
}

// == Hashed Keys ==
/// Digests keys before prefixing, bounding the physical key length.
///
/// Physical form: `lower(prefix + "$" + hex(md5(key)))`.
///
/// Use when logical keys may exceed the backend's key-length limit
/// (memcached historically caps keys at 250 bytes, prefix included).
/// The digest is always 32 hex characters regardless of input length,
/// trading debuggability for boundedness. Distinct logical keys collide
/// only by MD5 collision, which is negligible for cache purposes.
#[derive(Debug, Clone)]
pub struct HashedKeys {
    /// Namespace prefix for all keys produced by this strategy
    prefix: String,
}

impl HashedKeys {
    /// Creates a hashed key strategy for the given namespace prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl KeyStrategy for HashedKeys {
    fn transform(&self, key: &str) -> String {
        let digest = Md5::digest(key.as_bytes());
        format!("{}{}{}", self.prefix, KEY_SEPARATOR, hex::encode(digest)).to_lowercase()
    }
}
