use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::DisplayRecord;

/// Records emitted by one polling tick
#[derive(Debug, Clone, Serialize)]
pub struct Tick {
    pub timestamp: DateTime<Utc>,
    /// Set when the counter source failed and the records were carried over
    pub stale: bool,
    pub interfaces: Vec<DisplayRecord>,
}

impl Tick {
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now(),
            stale: false,
            interfaces: Vec::new(),
        }
    }
}

/// Port for publishing and reading the latest tick
pub trait RecordStore: Send + Sync {
    /// Replace the latest tick
    fn publish(&self, tick: Tick);

    /// Get the most recent tick
    fn latest(&self) -> Arc<Tick>;
}
