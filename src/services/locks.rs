//! Keyed serialization for multi-step store sequences.
//!
//! Every engine operation is a short check-then-act sequence against the
//! backing store. Concurrent requests touching the same user, copy or book
//! are funnelled through one async mutex per key so both cannot pass the
//! same guard. Acquisition order is fixed where two keys are taken
//! (user before copy, in loan admission) so the registry cannot deadlock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Entities the engine serializes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKey {
    User(i32),
    Book(i32),
    Copy(i32),
    /// Single key claimed by the expiry sweep so overlapping sweep runs
    /// cannot double-expire or double-promote
    Sweep,
}

/// Registry of per-key async mutexes.
///
/// Entries live only while held or contended; the last guard to release a
/// key removes its mutex from the map.
#[derive(Default)]
pub struct LockRegistry {
    locks: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the mutex for `key`, creating it on first use
    pub async fn acquire(&self, key: LockKey) -> KeyedGuard<'_> {
        let lock = {
            let mut map = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(key).or_default())
        };
        let guard = lock.lock_owned().await;
        KeyedGuard {
            registry: self,
            key,
            guard: Some(guard),
        }
    }
}

/// Guard over one registry key. Releasing it evicts the key's mutex from
/// the registry unless another task is holding or awaiting it.
pub struct KeyedGuard<'a> {
    registry: &'a LockRegistry,
    key: LockKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        // release the mutex first so its Arc count reflects waiters only
        self.guard.take();
        let mut map = self
            .registry
            .locks
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = map.get(&self.key) {
            // a waiter blocked in acquire holds its own clone
            if Arc::strong_count(lock) == 1 {
                map.remove(&self.key);
            }
        }
    }
}
