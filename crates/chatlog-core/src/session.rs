// Session domain types
//
// A Session tracks one chat widget conversation: when it started, which
// browser opened it, and how many messages/appointments were logged for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Sessions keyed by their externally supplied id
pub type SessionMap = BTreeMap<String, Session>;

/// Session status.
///
/// Only `active` exists; no transitions are modelled.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
        }
    }
}

/// Session - one chat widget conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Identifier supplied by the widget.
    pub id: String,
    /// Timestamp when the session was created.
    pub start_time: DateTime<Utc>,
    /// Browser user agent reported by the widget.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    /// Number of `message` log entries referencing this session.
    #[serde(default)]
    pub message_count: u64,
    /// Number of `appointment` log entries referencing this session.
    #[serde(default)]
    pub appointment_count: u64,
}

impl Session {
    pub fn new(
        id: impl Into<String>,
        user_agent: Option<String>,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            user_agent,
            status: SessionStatus::Active,
            message_count: 0,
            appointment_count: 0,
        }
    }
}
