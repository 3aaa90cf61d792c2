//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default entry expiry in hours when no override is configured.
pub const DEFAULT_EXPIRY_HOURS: u64 = 24;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Default TTL applied to entries set without an explicit expiry
    pub default_ttl: Duration,
    /// Maximum number of entries the in-memory store can hold
    pub max_entries: usize,
    /// Background sweeper interval in seconds
    pub sweep_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STASH_CACHE_EXPIRY_HOURS` - Default entry expiry in hours (default: 24)
    /// - `STASH_CACHE_MAX_ENTRIES` - In-memory store capacity (default: 1000)
    /// - `STASH_CACHE_SWEEP_INTERVAL` - Sweeper frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let expiry_hours: u64 = env::var("STASH_CACHE_EXPIRY_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRY_HOURS);

        Self {
            // saturate rather than overflow on absurd configured values
            default_ttl: Duration::from_secs(expiry_hours.saturating_mul(3600)),
            max_entries: env::var("STASH_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            sweep_interval: env::var("STASH_CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(60),
        }
    }

    /// Replaces the default TTL, keeping the other parameters.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(DEFAULT_EXPIRY_HOURS * 3600),
            max_entries: 1000,
            sweep_interval: 60,
        }
    }
}
