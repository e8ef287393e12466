// Persistence contract for the event store
//
// Implementations:
// - InMemoryGateway (this crate) for examples and testing
// - JsonFileGateway (chatlog-storage) for flat-file production use

use async_trait::async_trait;

use crate::error::Result;
use crate::log_entry::LogEntry;
use crate::session::SessionMap;

/// Full copy of the store's durable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Logs, most recent first.
    pub logs: Vec<LogEntry>,
    pub sessions: SessionMap,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.sessions.is_empty()
    }
}

/// Loads and saves full snapshots of the store.
///
/// Gateways hold no business logic. Each flush overwrites the previous
/// snapshot entirely.
#[async_trait]
pub trait SnapshotGateway: Send + Sync {
    /// Read the persisted state.
    ///
    /// Never fails: a missing, unreadable or corrupt blob is replaced by its
    /// empty default (logs and sessions are recovered independently).
    async fn load(&self) -> Snapshot;

    /// Overwrite the persisted state.
    ///
    /// Logs are re-sorted newest first before writing, whatever their
    /// in-memory order.
    async fn flush(&self, logs: Vec<LogEntry>, sessions: &SessionMap) -> Result<()>;
}
