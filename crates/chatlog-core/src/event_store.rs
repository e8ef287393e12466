// Event store
//
// Authoritative in-memory holder of the interaction log and the session map.
// Every mutation runs validate -> mutate -> flush while holding the state
// mutex, so concurrent callers are serialized and every persisted snapshot
// is a state that actually existed in memory.
//
// Flush failures are logged and swallowed: memory stays authoritative until
// the next successful flush. Writes are full snapshots, so each mutation
// costs O(total size) - fine for chatbot telemetry volumes, a known ceiling
// beyond that.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::error::{require, Result, StoreError};
use crate::ids::LogIdGenerator;
use crate::log_entry::{
    appointment_summary, error_summary, message_summary, sort_newest_first, LogEntry, LogEntryType,
    MessageDetails, SessionStartDetails, SESSION_STARTED_SUMMARY,
};
use crate::requests::{
    AppendAppointmentRequest, AppendErrorRequest, AppendMessageRequest, CreateSessionRequest,
};
use crate::session::{Session, SessionMap};
use crate::stats::{start_of_day, DailyStats, HealthReport};
use crate::traits::{Snapshot, SnapshotGateway};

struct StoreState {
    /// Newest first; appends go to the front.
    logs: VecDeque<LogEntry>,
    sessions: SessionMap,
    ids: LogIdGenerator,
}

impl StoreState {
    fn append(
        &mut self,
        now: DateTime<Utc>,
        session_id: &str,
        entry_type: LogEntryType,
        message: String,
        details: serde_json::Value,
    ) -> i64 {
        let id = self.ids.next_at(now);
        self.logs.push_front(LogEntry::new(
            id, session_id, entry_type, message, now, details,
        ));
        id
    }
}

/// In-memory log and session store backed by a snapshot gateway.
pub struct EventStore {
    state: Mutex<StoreState>,
    gateway: Arc<dyn SnapshotGateway>,
}

impl EventStore {
    /// Load persisted state through `gateway` and build the store.
    pub async fn open(gateway: Arc<dyn SnapshotGateway>) -> Self {
        let Snapshot { mut logs, sessions } = gateway.load().await;
        sort_newest_first(&mut logs);
        let last_id = logs.iter().map(|entry| entry.id).max().unwrap_or(0);

        info!(
            log_count = logs.len(),
            session_count = sessions.len(),
            "Event store loaded"
        );

        Self {
            state: Mutex::new(StoreState {
                logs: logs.into(),
                sessions,
                ids: LogIdGenerator::seeded(last_id),
            }),
            gateway,
        }
    }

    /// Create a session, replacing any existing session with the same id.
    ///
    /// Re-creating an id resets its counters. Also logs a session start event.
    pub async fn create_session(&self, req: CreateSessionRequest) -> Result<Session> {
        let session_id = require(&req.session_id, "sessionId")?;
        let details = serde_json::to_value(SessionStartDetails {
            user_agent: req.user_agent.clone(),
        })?;

        let mut state = self.state.lock().await;
        let now = Utc::now();
        let session = Session::new(session_id, req.user_agent.clone(), now);
        if state
            .sessions
            .insert(session_id.to_string(), session.clone())
            .is_some()
        {
            debug!(session_id = %session_id, "Session re-created, counters reset");
        }
        state.append(
            now,
            session_id,
            LogEntryType::Event,
            SESSION_STARTED_SUMMARY.to_string(),
            details,
        );
        self.flush_or_log(&state).await;

        info!(session_id = %session_id, "Session created");
        Ok(session)
    }

    /// Log a chat message and bump the session's message counter.
    ///
    /// Unknown session ids are accepted; no counter is touched.
    pub async fn append_message(&self, req: AppendMessageRequest) -> Result<i64> {
        let session_id = require(&req.session_id, "sessionId")?;
        let sender = require(&req.sender, "sender")?;
        let text = require(&req.message, "message")?;

        let summary = message_summary(sender, text);
        let details = serde_json::to_value(MessageDetails {
            sender: sender.to_string(),
            full_message: text.to_string(),
            current_flow: req.current_flow.clone(),
        })?;

        let mut state = self.state.lock().await;
        let id = state.append(
            Utc::now(),
            session_id,
            LogEntryType::Message,
            summary,
            details,
        );
        match state.sessions.get_mut(session_id) {
            Some(session) => session.message_count += 1,
            None => debug!(session_id = %session_id, "Message for unknown session"),
        }
        self.flush_or_log(&state).await;

        debug!(session_id = %session_id, log_id = id, sender = %sender, "Message logged");
        Ok(id)
    }

    /// Log a booked appointment and bump the session's appointment counter.
    pub async fn append_appointment(&self, req: AppendAppointmentRequest) -> Result<i64> {
        let session_id = require(&req.session_id, "sessionId")?;
        let appointment = match req.appointment_data {
            Some(data) if !data.is_null() => data,
            _ => return Err(StoreError::missing_field("appointmentData")),
        };

        let summary = appointment_summary(&appointment);

        let mut state = self.state.lock().await;
        let id = state.append(
            Utc::now(),
            session_id,
            LogEntryType::Appointment,
            summary,
            appointment,
        );
        match state.sessions.get_mut(session_id) {
            Some(session) => session.appointment_count += 1,
            None => debug!(session_id = %session_id, "Appointment for unknown session"),
        }
        self.flush_or_log(&state).await;

        info!(session_id = %session_id, log_id = id, "Appointment logged");
        Ok(id)
    }

    /// Log an error reported by the chat widget. Counters are untouched.
    pub async fn append_error(&self, req: AppendErrorRequest) -> Result<i64> {
        let session_id = require(&req.session_id, "sessionId")?;
        let message = require(&req.message, "message")?;

        let summary = error_summary(message);
        let details = req.details.clone().unwrap_or(serde_json::Value::Null);

        let mut state = self.state.lock().await;
        let id = state.append(
            Utc::now(),
            session_id,
            LogEntryType::Error,
            summary,
            details,
        );
        self.flush_or_log(&state).await;

        info!(session_id = %session_id, log_id = id, "Error logged");
        Ok(id)
    }

    /// All log entries, newest first.
    pub async fn list_logs(&self) -> Vec<LogEntry> {
        self.state.lock().await.logs.iter().cloned().collect()
    }

    /// All sessions, most recently started first.
    pub async fn list_sessions(&self) -> Vec<Session> {
        let mut sessions: Vec<Session> =
            self.state.lock().await.sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        sessions
    }

    /// Activity since the start of the day containing `now` (in `now`'s zone).
    pub async fn compute_stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DailyStats {
        let since = start_of_day(now);
        let state = self.state.lock().await;

        let mut stats = DailyStats {
            total_sessions_today: state
                .sessions
                .values()
                .filter(|s| s.start_time >= since)
                .count(),
            ..DailyStats::default()
        };
        for entry in state.logs.iter().filter(|entry| entry.is_since(since)) {
            match entry.entry_type {
                LogEntryType::Message => stats.total_messages_today += 1,
                LogEntryType::Appointment => stats.total_appointments_today += 1,
                LogEntryType::Error => stats.total_errors_today += 1,
                LogEntryType::Event => {}
            }
        }
        stats
    }

    pub async fn health(&self) -> HealthReport {
        let state = self.state.lock().await;
        HealthReport {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            log_count: state.logs.len(),
            session_count: state.sessions.len(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Final flush before the process exits.
    pub async fn shutdown_flush(&self) -> Result<()> {
        let state = self.state.lock().await;
        self.flush(&state).await?;
        info!(
            log_count = state.logs.len(),
            session_count = state.sessions.len(),
            "Final snapshot flushed"
        );
        Ok(())
    }

    async fn flush(&self, state: &StoreState) -> Result<()> {
        let logs: Vec<LogEntry> = state.logs.iter().cloned().collect();
        self.gateway.flush(logs, &state.sessions).await
    }

    async fn flush_or_log(&self, state: &StoreState) {
        if let Err(e) = self.flush(state).await {
            error!(error = %e, "Failed to flush snapshot; keeping in-memory state");
        }
    }
}
