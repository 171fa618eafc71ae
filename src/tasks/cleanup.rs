//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

// == Sweep ==
/// Removes every expired entry from the shared store.
///
/// Expired keys are collected under a read lock, then removed one at a time
/// under short write locks so concurrent requests are never blocked for a
/// whole scan. Returns the number of entries removed.
pub async fn sweep_expired(cache: &SharedCache) -> usize {
    let expired = cache.read().await.expired_keys();

    let mut removed = 0;
    for key in expired {
        if cache.write().await.remove_if_expired(&key) {
            removed += 1;
        }
    }
    removed
}

// == Sweep Handle ==
/// Owns a running cleanup task.
///
/// `stop` shuts the task down and waits for it. Dropping the handle without
/// calling `stop` aborts the task.
#[derive(Debug)]
pub struct SweepHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    /// Signals the task to stop and waits for it to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Cleanup task ended abnormally: {}", e);
            }
        }
        info!("Cache cleanup task stopped");
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Spawns a background task that sweeps expired entries every `interval`.
///
/// # Example
/// ```ignore
/// let cache = cache::shared(CacheStore::new(CacheSettings::default()));
/// let sweep = spawn_cleanup_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweep.stop().await;
/// ```
pub fn spawn_cleanup_task(cache: SharedCache, interval: Duration) -> SweepHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} ms",
            interval.as_millis()
        );

        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let removed = sweep_expired(&cache).await;
                    if removed > 0 {
                        let remaining = cache.read().await.len();
                        info!(removed, remaining, "Cache cleanup: removed expired entries");
                    } else {
                        debug!("Cache cleanup: no expired entries found");
                    }
                }
            }
        }
    });

    SweepHandle {
        shutdown: Some(shutdown_tx),
        task: Some(task),
    }
}
