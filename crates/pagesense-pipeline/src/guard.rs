//! Per-URL mutual exclusion for pipeline runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per URL. Entries are dropped once no run holds
/// or waits on them, so the map only grows with in-flight URLs.
#[derive(Debug, Default)]
pub struct UrlLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl UrlLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other run holds `url`, then hold it until the guard drops.
    pub async fn acquire(&self, url: &str) -> UrlGuard<'_> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(url.to_owned()).or_default())
        };
        let guard = lock.lock_owned().await;
        UrlGuard {
            locks: self,
            url: url.to_owned(),
            guard: Some(guard),
        }
    }

    /// Number of URLs currently tracked.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub struct UrlGuard<'a> {
    locks: &'a UrlLocks,
    url: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UrlGuard<'_> {
    fn drop(&mut self) {
        // Release before inspecting the count so our own handle is gone.
        drop(self.guard.take());

        let mut map = self
            .locks
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if map
            .get(&self.url)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.url);
        }
    }
}
