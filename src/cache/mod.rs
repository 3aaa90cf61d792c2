//! Cache Module
//!
//! Typed caches over a backing store: the generic [`Cache`], the
//! check-and-set [`CasCache`], the value-type [`ValueCache`] and blocking
//! wrappers for synchronous callers.

mod blocking;
mod cas;
mod typed;
mod value;


// Re-export public types
pub use blocking::{BlockingCache, BlockingCasCache, BlockingValueCache};
pub use cas::{CasCache, CheckResult};
pub use typed::Cache;
pub use value::ValueCache;
