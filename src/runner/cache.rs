//! Snapshot hand-off between the fetch loop and the decision loop.
//!
//! The fetch loop publishes whole snapshots by replacement; the decision
//! loop always reads the most recent one. A failed or malformed fetch
//! publishes nothing, so consumers keep working from the last good state.

use crate::state::model::ArenaState;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone)]
pub struct SnapshotCache {
    tx: watch::Sender<Option<Arc<ArenaState>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, state: ArenaState) {
        self.tx.send_replace(Some(Arc::new(state)));
    }

    /// The most recent snapshot, if any fetch has succeeded yet.
    pub fn latest(&self) -> Option<Arc<ArenaState>> {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<ArenaState>>> {
        self.tx.subscribe()
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Last-known operational status, readable from outside the loops (the
/// seam a dashboard or health endpoint would attach to).
#[derive(Debug, Clone, Default)]
pub struct Status {
    pub last_error: Option<String>,
    pub last_send_code: Option<i32>,
    pub last_cycle_ms: Option<u64>,
}

#[derive(Clone, Default)]
pub struct StatusHandle {
    inner: Arc<std::sync::RwLock<Status>>,
}

impl StatusHandle {
    pub fn new() -> Self {
        Self::default()
    }

    // Status is last-write-wins telemetry; a poisoned lock still holds a
    // usable value, so recover the guard instead of propagating the panic.

    pub fn snapshot(&self) -> Status {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_error(&self, message: Option<String>) {
        self.write().last_error = message;
    }

    pub fn set_send_code(&self, code: i32) {
        self.write().last_send_code = Some(code);
    }

    pub fn set_cycle_ms(&self, ms: u64) {
        self.write().last_cycle_ms = Some(ms);
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Status> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
