use std::sync::{Arc, PoisonError, RwLock};

use crate::ports::{RecordStore, Tick};

/// In-memory store holding only the latest tick
pub struct MemoryStore {
    latest: RwLock<Arc<Tick>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            latest: RwLock::new(Arc::new(Tick::empty())),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn publish(&self, tick: Tick) {
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = Arc::new(tick);
    }

    fn latest(&self) -> Arc<Tick> {
        self.latest.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
}
