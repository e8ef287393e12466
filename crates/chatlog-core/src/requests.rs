// Inputs for store mutations
//
// Fields are optional on purpose: a missing field is a validation error
// reported by the store (400), not a deserialization failure.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to create (or reset) a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Identifier generated by the chat widget.
    #[cfg_attr(feature = "openapi", schema(example = "session_1718000000000"))]
    pub session_id: Option<String>,
    /// Browser user agent.
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl CreateSessionRequest {
    pub fn new(session_id: impl Into<String>, user_agent: Option<&str>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            user_agent: user_agent.map(str::to_string),
        }
    }
}

/// Request to log a chat message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AppendMessageRequest {
    pub session_id: Option<String>,
    /// `user` for the human side; anything else is treated as the bot.
    #[cfg_attr(feature = "openapi", schema(example = "user"))]
    pub sender: Option<String>,
    pub message: Option<String>,
    /// Conversation flow the widget is in.
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub current_flow: Option<serde_json::Value>,
}

impl AppendMessageRequest {
    pub fn new(
        session_id: impl Into<String>,
        sender: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: Some(session_id.into()),
            sender: Some(sender.into()),
            message: Some(message.into()),
            current_flow: None,
        }
    }

    pub fn with_flow(mut self, flow: serde_json::Value) -> Self {
        self.current_flow = Some(flow);
        self
    }
}

/// Request to log a booked appointment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AppendAppointmentRequest {
    pub session_id: Option<String>,
    /// Full appointment record; `patientName` is used in the summary.
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub appointment_data: Option<serde_json::Value>,
}

impl AppendAppointmentRequest {
    pub fn new(session_id: impl Into<String>, appointment_data: serde_json::Value) -> Self {
        Self {
            session_id: Some(session_id.into()),
            appointment_data: Some(appointment_data),
        }
    }
}

/// Request to log an error reported by the widget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AppendErrorRequest {
    pub session_id: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    #[cfg_attr(feature = "openapi", schema(value_type = Option<Object>))]
    pub details: Option<serde_json::Value>,
}

impl AppendErrorRequest {
    pub fn new(session_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            session_id: Some(session_id.into()),
            message: Some(message.into()),
            details: None,
        }
    }
}
