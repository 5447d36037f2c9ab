use crate::domain::SiteId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Mutex<HashMap<SiteId, Arc<AsyncMutex<()>>>>;

/// One async mutex per site id. Holding the guard is what makes a manifest
/// read-modify-write span exclusive within this process. Entries only live
/// while some task holds or waits on them.
#[derive(Default)]
pub struct SiteLocks {
    inner: Arc<LockMap>,
}

/// Exclusive hold on one site. Dropping it unlocks the site and forgets the
/// registry entry when nobody else is waiting.
pub struct SiteGuard {
    guard: Option<OwnedMutexGuard<()>>,
    site: SiteId,
    registry: Arc<LockMap>,
}

impl SiteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, site: &SiteId) -> SiteGuard {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            map.entry(site.clone()).or_default().clone()
        };
        SiteGuard {
            guard: Some(lock.lock_owned().await),
            site: site.clone(),
            registry: self.inner.clone(),
        }
    }

    pub fn tracked(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Drop for SiteGuard {
    fn drop(&mut self) {
        // the owned guard keeps its own reference to the mutex
        drop(self.guard.take());

        let mut map = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        if map
            .get(&self.site)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            map.remove(&self.site);
        }
    }
}
