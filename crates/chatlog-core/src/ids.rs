// Log id generation
//
// Ids are milliseconds since the Unix epoch, bumped past the previous id
// when two entries land in the same millisecond (or the clock steps back).

use chrono::{DateTime, Utc};

/// Generates strictly increasing, time-derived log ids.
#[derive(Debug, Clone, Default)]
pub struct LogIdGenerator {
    last: i64,
}

impl LogIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue after the highest id already issued (e.g. loaded from disk)
    pub fn seeded(last: i64) -> Self {
        Self { last }
    }

    /// Next id for an entry created at `now`
    pub fn next_at(&mut self, now: DateTime<Utc>) -> i64 {
        let candidate = now.timestamp_millis();
        self.last = candidate.max(self.last.saturating_add(1));
        self.last
    }

    pub fn last(&self) -> i64 {
        self.last
    }
}
