//! Latest-snapshot cache shared between the scheduler and the query API.
//!
//! Single writer (the refresh scheduler), many readers (HTTP handlers).
//! Every write swaps the whole state under one lock guard, and reads hand
//! out clones, so no reader ever observes records from one cycle paired
//! with status from another.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{MetalPrice, UtcDateTime};

/// Outcome of the most recent refresh attempt for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Success,
    Failed,
}

/// The complete cached price state served to clients.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub records: Vec<MetalPrice>,
    /// Stamp of the last refresh that produced records; `None` until the
    /// first success, and untouched by failed cycles so staleness stays
    /// observable.
    pub last_updated: Option<UtcDateTime>,
    pub source_status: BTreeMap<String, SourceStatus>,
}

/// Shared handle to the current snapshot.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<tokio::sync::RwLock<Snapshot>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh record set, stamping `last_updated` with the current
    /// time.
    pub async fn replace(
        &self,
        records: Vec<MetalPrice>,
        source_status: BTreeMap<String, SourceStatus>,
    ) {
        let mut snapshot = self.inner.write().await;
        snapshot.records = records;
        snapshot.last_updated = Some(UtcDateTime::now());
        snapshot.source_status = source_status;
    }

    /// Record a failed cycle: records are emptied and status flips, but
    /// `last_updated` keeps pointing at the last success.
    pub async fn mark_failed(&self, source_status: BTreeMap<String, SourceStatus>) {
        let mut snapshot = self.inner.write().await;
        snapshot.records.clear();
        snapshot.source_status = source_status;
    }

    /// Clone of the current state.
    pub async fn read(&self) -> Snapshot {
        self.inner.read().await.clone()
    }
}
