//! Time-bounded memoization of the full task list.
//!
//! A single slot holds the last list read from the store, stamped with the
//! read time. Any mutation invalidates the slot unconditionally; there is
//! no row-level invalidation. The cache is best-effort only: an empty or
//! expired slot degrades to a store read, never an error. Out-of-band grid
//! edits stay invisible for up to the TTL, an accepted trade-off.

use crate::types::Task;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

struct CacheSlot {
    tasks: Vec<Task>,
    stored_at: Instant,
}

/// Shared TTL cache for the task list.
#[derive(Clone)]
pub struct TaskCache {
    slot: Arc<Mutex<Option<CacheSlot>>>,
    ttl: Duration,
}

impl TaskCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// Return the cached list if present and not expired.
    pub fn get(&self) -> Option<Vec<Task>> {
        let slot = self.slot.lock().unwrap();
        match slot.as_ref() {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                debug!(count = entry.tasks.len(), "task cache hit");
                Some(entry.tasks.clone())
            }
            Some(_) => {
                debug!("task cache expired");
                None
            }
            None => None,
        }
    }

    /// Store a freshly read list, restarting the TTL clock.
    pub fn put(&self, tasks: Vec<Task>) {
        let mut slot = self.slot.lock().unwrap();
        *slot = Some(CacheSlot {
            tasks,
            stored_at: Instant::now(),
        });
    }

    /// Drop the cached list. Called on every mutation.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap();
        if slot.take().is_some() {
            debug!("task cache invalidated");
        }
    }
}
