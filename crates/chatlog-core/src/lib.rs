// Chat Log Core
//
// This crate provides the storage-agnostic heart of the chatbot interaction log:
// an append-only log of events plus per-session counters, and the contract
// used to persist them.
//
// Key design decisions:
// - EventStore is the single point of mutation and read; no ambient globals
// - Persistence is pluggable via the SnapshotGateway trait (files, memory)
// - Every mutation is validate -> mutate -> flush under one async mutex
// - Log ids are time-derived but strictly monotonic
// - Referential integrity between log entries and sessions is not enforced

// Domain entity types
pub mod log_entry;
pub mod requests;
pub mod session;
pub mod stats;

pub mod error;
pub mod event_store;
pub mod ids;
pub mod traits;

// In-memory implementation for tests and local runs
pub mod memory;

// Re-exports for convenience
pub use error::{Result, StoreError};
pub use event_store::EventStore;
pub use ids::LogIdGenerator;
pub use log_entry::{
    sort_newest_first, LogEntry, LogEntryType, MessageDetails, SessionStartDetails,
};
pub use memory::InMemoryGateway;
pub use requests::{
    AppendAppointmentRequest, AppendErrorRequest, AppendMessageRequest, CreateSessionRequest,
};
pub use session::{Session, SessionMap, SessionStatus};
pub use stats::{DailyStats, HealthReport};
pub use traits::{Snapshot, SnapshotGateway};
