// Per-flow mutual exclusion
//
// Each named flow gets its own async mutex. Callers of the same flow run
// one after another; different flows do not block each other.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct SingleFlight {
    locks: DashMap<&'static str, Arc<Mutex<()>>>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other caller holds `key`, then hold it until the
    /// guard is dropped.
    pub async fn acquire(&self, key: &'static str) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the DashMap shard lock is released before awaiting
        let lock = self.locks.entry(key).or_default().clone();
        lock.lock_owned().await
    }
}
