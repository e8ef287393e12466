// Interaction log HTTP routes
//
// The chat widget posts messages, appointments and errors here; the
// dashboard reads the full log back.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chatlog_core::{AppendAppointmentRequest, AppendErrorRequest, AppendMessageRequest, LogEntry};

use crate::common::{ApiError, ErrorResponse, ListResponse, LogCreatedResponse};
use crate::AppState;

/// Create log routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/logs", get(list_logs))
        .route("/api/logs/message", post(append_message))
        .route("/api/logs/appointment", post(append_appointment))
        .route("/api/logs/error", post(append_error))
        .with_state(state)
}

/// POST /api/logs/message - Log a chat message
#[utoipa::path(
    post,
    path = "/api/logs/message",
    request_body = AppendMessageRequest,
    responses(
        (status = 201, description = "Message logged", body = LogCreatedResponse),
        (status = 400, description = "sessionId, sender or message missing", body = ErrorResponse)
    ),
    tag = "logs"
)]
pub async fn append_message(
    State(state): State<AppState>,
    Json(req): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<LogCreatedResponse>), ApiError> {
    let log_id = state.store.append_message(req).await?;
    Ok((StatusCode::CREATED, Json(LogCreatedResponse::new(log_id))))
}

/// POST /api/logs/appointment - Log a booked appointment
#[utoipa::path(
    post,
    path = "/api/logs/appointment",
    request_body = AppendAppointmentRequest,
    responses(
        (status = 201, description = "Appointment logged", body = LogCreatedResponse),
        (status = 400, description = "sessionId or appointmentData missing", body = ErrorResponse)
    ),
    tag = "logs"
)]
pub async fn append_appointment(
    State(state): State<AppState>,
    Json(req): Json<AppendAppointmentRequest>,
) -> Result<(StatusCode, Json<LogCreatedResponse>), ApiError> {
    let log_id = state.store.append_appointment(req).await?;
    Ok((StatusCode::CREATED, Json(LogCreatedResponse::new(log_id))))
}

/// POST /api/logs/error - Log an error reported by the widget
#[utoipa::path(
    post,
    path = "/api/logs/error",
    request_body = AppendErrorRequest,
    responses(
        (status = 201, description = "Error logged", body = LogCreatedResponse),
        (status = 400, description = "sessionId or message missing", body = ErrorResponse)
    ),
    tag = "logs"
)]
pub async fn append_error(
    State(state): State<AppState>,
    Json(req): Json<AppendErrorRequest>,
) -> Result<(StatusCode, Json<LogCreatedResponse>), ApiError> {
    let log_id = state.store.append_error(req).await?;
    Ok((StatusCode::CREATED, Json(LogCreatedResponse::new(log_id))))
}

/// GET /api/logs - Full interaction log, newest first
#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "All log entries", body = ListResponse<LogEntry>)
    ),
    tag = "logs"
)]
pub async fn list_logs(State(state): State<AppState>) -> Json<ListResponse<LogEntry>> {
    Json(ListResponse::new(state.store.list_logs().await))
}
