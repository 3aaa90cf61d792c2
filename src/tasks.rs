//! Background Tasks Module
//!
//! Periodic sweeper that removes expired entries from a [`MemoryStore`].
//!
//! Expired entries are already invisible to readers; the sweeper just
//! reclaims their memory between accesses.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::store::MemoryStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task loops forever, sleeping `sweep_interval_secs` between runs.
/// Abort the returned handle during shutdown.
///
/// # Example
/// ```ignore
/// let store = Arc::new(MemoryStore::new(1000));
/// let handle = spawn_sweeper_task(store.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweeper_task(store: Arc<MemoryStore>, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiry sweeper with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.cleanup_expired().await;
            if removed > 0 {
                info!("Expiry sweep: removed {} entries", removed);
            } else {
                debug!("Expiry sweep: nothing to remove");
            }
        }
    })
}
