// Log entry domain types
//
// A LogEntry is an immutable record of one observed chatbot interaction.
// The `details` payload depends on the entry type:
// - `event` → SessionStartDetails (or arbitrary metadata)
// - `message` → MessageDetails
// - `appointment` → the full appointment record as sent by the widget
// - `error` → arbitrary error context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Maximum number of characters of a chat message kept in the summary
pub const SUMMARY_MAX_CHARS: usize = 100;

/// Appended to a summary when the message was truncated
pub const ELLIPSIS: &str = "...";

/// Sender value identifying the human side of the conversation
pub const USER_SENDER: &str = "user";

/// Label used in summaries for human-sent messages
pub const USER_LABEL: &str = "Usuário";

/// Label used in summaries for every other sender
pub const BOT_LABEL: &str = "Bot";

/// Summary used for session start events
pub const SESSION_STARTED_SUMMARY: &str = "Nova sessão iniciada";

/// Placeholder used when an appointment carries no patient name
pub const UNKNOWN_PATIENT: &str = "paciente não informado";

/// Kind of log entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogEntryType {
    /// Lifecycle event (e.g. session started)
    Event,
    /// Chat message from the user or the bot
    Message,
    /// Appointment booked through the chat
    Appointment,
    /// Error reported by the widget
    Error,
}

impl LogEntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogEntryType::Event => "event",
            LogEntryType::Message => "message",
            LogEntryType::Appointment => "appointment",
            LogEntryType::Error => "error",
        }
    }
}

impl std::fmt::Display for LogEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of the interaction log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Time-derived, strictly increasing identifier.
    pub id: i64,
    /// Session this entry refers to. Not required to exist.
    pub session_id: String,
    /// Entry kind.
    #[serde(rename = "type")]
    pub entry_type: LogEntryType,
    /// Human-readable summary.
    pub message: String,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Type-specific payload.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Object))]
    pub details: serde_json::Value,
}

impl LogEntry {
    pub fn new(
        id: i64,
        session_id: impl Into<String>,
        entry_type: LogEntryType,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id,
            session_id: session_id.into(),
            entry_type,
            message: message.into(),
            timestamp,
            details,
        }
    }

    /// Typed view of the details of a `message` entry
    pub fn message_details(&self) -> Option<MessageDetails> {
        if self.entry_type != LogEntryType::Message {
            return None;
        }
        serde_json::from_value(self.details.clone()).ok()
    }

    /// Whether the entry was created at or after `since`
    pub fn is_since(&self, since: DateTime<Utc>) -> bool {
        self.timestamp >= since
    }
}

/// Details of a `message` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MessageDetails {
    /// Who sent the message (`user` for the human side).
    pub sender: String,
    /// The untruncated message text.
    pub full_message: String,
    /// Conversation flow the widget was in when the message was sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub current_flow: Option<serde_json::Value>,
}

/// Details of a session start `event` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SessionStartDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Summary line for a chat message: sender label plus at most
/// SUMMARY_MAX_CHARS characters of the text.
pub fn message_summary(sender: &str, text: &str) -> String {
    let label = if sender == USER_SENDER {
        USER_LABEL
    } else {
        BOT_LABEL
    };
    format!("{}: {}", label, truncate_chars(text, SUMMARY_MAX_CHARS))
}

/// Truncates on character boundaries, appending ELLIPSIS when anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Summary line for an appointment, naming the patient when one is given.
pub fn appointment_summary(appointment: &serde_json::Value) -> String {
    let patient = appointment
        .get("patientName")
        .and_then(|v| v.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_PATIENT);
    format!("Agendamento criado para {}", patient)
}

/// Summary line for an error entry
pub fn error_summary(message: &str) -> String {
    format!("Erro: {}", message)
}

/// Orders logs most recent first; equal timestamps fall back to id.
pub fn sort_newest_first(logs: &mut [LogEntry]) {
    logs.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}
