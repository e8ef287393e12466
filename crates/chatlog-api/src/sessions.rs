// Session HTTP routes

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chatlog_core::{CreateSessionRequest, Session};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::{ApiError, ErrorResponse, ListResponse};
use crate::AppState;

/// Response to a session creation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionCreatedResponse {
    pub success: bool,
    pub session: Session,
}

/// Create session routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/sessions", post(create_session).get(list_sessions))
        .with_state(state)
}

/// POST /api/sessions - Start (or restart) a chat session
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created successfully", body = SessionCreatedResponse),
        (status = 400, description = "sessionId missing", body = ErrorResponse)
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionCreatedResponse>), ApiError> {
    let session = state.store.create_session(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(SessionCreatedResponse {
            success: true,
            session,
        }),
    ))
}

/// GET /api/sessions - List sessions, most recently started first
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "List of sessions", body = ListResponse<Session>)
    ),
    tag = "sessions"
)]
pub async fn list_sessions(State(state): State<AppState>) -> Json<ListResponse<Session>> {
    Json(ListResponse::new(state.store.list_sessions().await))
}
