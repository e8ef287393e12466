// In-memory implementations for examples and testing
//
// InMemoryGateway keeps the "durable" snapshot in memory, counts flushes,
// and can be told to fail writes so flush-failure handling is testable.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::log_entry::{sort_newest_first, LogEntry};
use crate::session::SessionMap;
use crate::traits::{Snapshot, SnapshotGateway};

/// In-memory snapshot gateway
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    snapshot: RwLock<Snapshot>,
    flushes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryGateway {
    /// Create an empty gateway
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway that already holds persisted state (useful for testing)
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            ..Self::default()
        }
    }

    /// Number of successful flushes so far
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// Make subsequent flushes fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Copy of the last persisted snapshot
    pub async fn persisted(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl SnapshotGateway for InMemoryGateway {
    async fn load(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    async fn flush(&self, mut logs: Vec<LogEntry>, sessions: &SessionMap) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::PersistenceWrite {
                path: "memory".to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        sort_newest_first(&mut logs);
        *self.snapshot.write().await = Snapshot {
            logs,
            sessions: sessions.clone(),
        };
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
