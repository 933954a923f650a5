use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per key, created on first use and dropped once nobody holds
/// or waits on it.
#[derive(Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Holds the lock for one key until dropped.
pub struct KeyedGuard<'a> {
    owner: &'a KeyedLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.owner.prune(&self.key);
    }
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<AsyncMutex<()>>>> {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub async fn lock(&self, key: &str) -> KeyedGuard<'_> {
        let lock = self.entries().entry(key.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;

        KeyedGuard {
            owner: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Keys with a live lock entry.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Waiters clone the entry under the map lock, so a count of one means the
    // map holds the only reference.
    fn prune(&self, key: &str) {
        let mut locks = self.entries();
        if locks.get(key).map(|lock| Arc::strong_count(lock) == 1).unwrap_or(false) {
            locks.remove(key);
        }
    }
}
