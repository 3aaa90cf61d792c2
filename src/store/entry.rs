//! Store Entry Module
//!
//! Defines the record the in-memory store keeps per physical key.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

// == Store Entry ==
/// A stored payload with its expiry and revision token.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// Opaque serialized payload
    pub payload: Vec<u8>,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// Revision token for check-and-set writes
    pub token: u64,
    /// Recency stamp maintained by the store; lowest stamp is evicted first
    pub last_used: u64,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry expiring `ttl` from now, stamped with `token`.
    pub fn new(payload: Vec<u8>, ttl: Duration, token: u64) -> Self {
        let now = current_timestamp_ms();
        Self {
            payload,
            created_at: now,
            expires_at: now + ttl.as_millis() as u64,
            token,
            last_used: 0,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration
    /// time, so a read at exactly the boundary already misses.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining TTL in milliseconds, zero once expired.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.expires_at.saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns the current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
