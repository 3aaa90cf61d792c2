//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.
//!
//! The cache is a thin, non-swallowing layer: store and codec failures
//! surface to the caller verbatim, with no retry or fallback. A check-and-set
//! token mismatch is a normal `false` return, never an error.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for all cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A key was rejected by the backing store (e.g. over the length limit)
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The element type cannot be serialized by the configured codec.
    /// Raised once, at cache construction, never at operation time.
    #[error("Type {0} cannot be serialized")]
    UnsupportedType(String),

    /// A value could not be encoded to a payload
    #[error("Serialization failed: {0}")]
    Serialize(String),

    /// A stored payload could not be reconstructed as the expected type
    #[error("Deserialization failed: {0}")]
    Deserialize(String),

    /// The backing store failed to complete an operation
    #[error("Store error: {0}")]
    Store(String),

    /// Internal failure (e.g. runtime construction for blocking wrappers)
    #[error("Internal error: {0}")]
    Internal(String),
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
