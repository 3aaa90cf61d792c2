//! Codec Module
//!
//! Round-trips values to opaque byte payloads.
//!
//! A codec is owned by the cache that uses it and injected at construction;
//! there is no process-wide serializer state. Implementations must be
//! stateless or safe for concurrent reuse, since one cache instance may be
//! shared across tasks.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, Result};

// == Codec Trait ==
/// Converts values to and from opaque byte payloads.
///
/// Decoding a payload produced for a different, incompatible type must fail
/// with a deserialization error rather than silently coercing.
pub trait Codec: Send + Sync {
    /// Encodes a value into a payload.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>>;

    /// Decodes a payload back into a value.
    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T>;

    /// Returns whether a representative instance of a type can be encoded.
    ///
    /// Caches call this once at construction with a sample value and fail
    /// fast if it returns false, so an unstorable element type is rejected
    /// before any entry is written.
    fn validate<T: Serialize + ?Sized>(&self, sample: &T) -> bool {
        self.encode(sample).is_ok()
    }
}

// == JSON Codec ==
/// The default codec, encoding values as JSON via serde_json.
///
/// Stateless; a single instance may serve any number of concurrent calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| CacheError::Serialize(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, payload: &[u8]) -> Result<T> {
        serde_json::from_slice(payload).map_err(|e| CacheError::Deserialize(e.to_string()))
    }
}
