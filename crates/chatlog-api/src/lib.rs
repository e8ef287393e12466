// Chatlog API library
// Decision: Shared library for the server binary and router-level tests

pub mod common;
pub mod config;
pub mod logs;
pub mod sessions;
pub mod stats;

use axum::Router;
use chatlog_core::{
    AppendAppointmentRequest, AppendErrorRequest, AppendMessageRequest, CreateSessionRequest,
    DailyStats, EventStore, HealthReport, LogEntry, LogEntryType, Session, SessionStatus,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// App state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EventStore>,
}

impl AppState {
    pub fn new(store: Arc<EventStore>) -> Self {
        Self { store }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        sessions::create_session,
        sessions::list_sessions,
        logs::append_message,
        logs::append_appointment,
        logs::append_error,
        logs::list_logs,
        stats::get_stats,
        stats::health,
    ),
    components(
        schemas(
            LogEntry, LogEntryType, Session, SessionStatus, DailyStats, HealthReport,
            CreateSessionRequest, AppendMessageRequest, AppendAppointmentRequest,
            AppendErrorRequest,
            common::ErrorResponse, common::LogCreatedResponse,
            sessions::SessionCreatedResponse, stats::StatsResponse,
            common::ListResponse<LogEntry>,
            common::ListResponse<Session>,
        )
    ),
    tags(
        (name = "sessions", description = "Chat session endpoints"),
        (name = "logs", description = "Interaction log endpoints"),
        (name = "stats", description = "Dashboard metrics"),
        (name = "health", description = "Service health")
    ),
    info(
        title = "Chatlog API",
        version = "0.1.0",
        description = "API for recording chatbot sessions, messages and appointments",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

/// Build the full application router (API routes, Swagger UI, request tracing)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(sessions::routes(state.clone()))
        .merge(logs::routes(state.clone()))
        .merge(stats::routes(state))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
