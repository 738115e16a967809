//! services/api/src/web/pomodoro.rs
//!
//! Pomodoro lifecycle endpoints. A pomodoro session is wall-clock
//! bookkeeping: the server records start and end, the client runs the
//! countdown.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::domain::{PomodoroSession, PomodoroStats, DEFAULT_POMODORO_MINUTES};
use utoipa::{IntoParams, ToSchema};

use crate::web::middleware::AuthUser;
use crate::web::port_error_response;
use crate::web::sessions::SubjectTotalResponse;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct StartPomodoroRequest {
    pub subject: String,
    /// Defaults to 25 minutes.
    pub duration_minutes: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct PomodoroResponse {
    pub session_id: i64,
    pub subject: String,
    pub duration_minutes: i64,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<PomodoroSession> for PomodoroResponse {
    fn from(s: PomodoroSession) -> Self {
        Self {
            session_id: s.session_id,
            subject: s.subject,
            duration_minutes: s.duration_minutes,
            status: s.status.as_str().to_string(),
            started_at: s.started_at,
            completed_at: s.completed_at,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// How many sessions to return. Defaults to 10.
    pub limit: Option<i64>,
}

#[derive(Serialize, ToSchema)]
pub struct PomodoroStatsResponse {
    pub completed_sessions: i64,
    pub completed_minutes: i64,
    pub today_sessions: i64,
    pub subjects: Vec<SubjectTotalResponse>,
}

impl From<PomodoroStats> for PomodoroStatsResponse {
    fn from(s: PomodoroStats) -> Self {
        Self {
            completed_sessions: s.completed_sessions,
            completed_minutes: s.completed_minutes,
            today_sessions: s.today_sessions,
            subjects: s.subjects.into_iter().map(Into::into).collect(),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /pomodoro/start - Start a focus session
#[utoipa::path(
    post,
    path = "/pomodoro/start",
    request_body = StartPomodoroRequest,
    responses(
        (status = 201, description = "Session started", body = PomodoroResponse),
        (status = 400, description = "Invalid subject or duration"),
        (status = 409, description = "A session is already active"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn start_pomodoro_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<StartPomodoroRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let duration = req.duration_minutes.unwrap_or(DEFAULT_POMODORO_MINUTES);

    let session = state
        .store
        .start_pomodoro(auth.user_id, &req.subject, duration)
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(PomodoroResponse::from(session))))
}

/// POST /pomodoro/{id}/complete - Finish an active session
#[utoipa::path(
    post,
    path = "/pomodoro/{id}/complete",
    params(("id" = i64, Path, description = "The pomodoro session")),
    responses(
        (status = 200, description = "Session completed", body = PomodoroResponse),
        (status = 404, description = "No such session for this user"),
        (status = 409, description = "Session is already in a terminal state"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn complete_pomodoro_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .store
        .complete_pomodoro(auth.user_id, id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(PomodoroResponse::from(session)))
}

/// POST /pomodoro/{id}/cancel - Abandon an active session
#[utoipa::path(
    post,
    path = "/pomodoro/{id}/cancel",
    params(("id" = i64, Path, description = "The pomodoro session")),
    responses(
        (status = 200, description = "Session cancelled", body = PomodoroResponse),
        (status = 404, description = "No such session for this user"),
        (status = 409, description = "Session is already in a terminal state"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn cancel_pomodoro_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .store
        .cancel_pomodoro(auth.user_id, id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(PomodoroResponse::from(session)))
}

/// GET /pomodoro/current - The single active session, if any
#[utoipa::path(
    get,
    path = "/pomodoro/current",
    responses(
        (status = 200, description = "The active session, or null", body = Option<PomodoroResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn current_pomodoro_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session = state
        .store
        .active_pomodoro(auth.user_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(session.map(PomodoroResponse::from)))
}

/// GET /pomodoro/recent - Most recently completed sessions
#[utoipa::path(
    get,
    path = "/pomodoro/recent",
    params(RecentQuery),
    responses(
        (status = 200, description = "Completed sessions, newest first", body = Vec<PomodoroResponse>),
        (status = 400, description = "Invalid limit"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn recent_pomodoros_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let sessions = state
        .store
        .recent_pomodoros(auth.user_id, query.limit.unwrap_or(10))
        .await
        .map_err(port_error_response)?;

    Ok(Json(
        sessions
            .into_iter()
            .map(PomodoroResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /pomodoro/stats - Completed-session statistics
#[utoipa::path(
    get,
    path = "/pomodoro/stats",
    responses(
        (status = 200, description = "Completed counts and per-subject breakdown", body = PomodoroStatsResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn pomodoro_stats_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let stats = state
        .store
        .pomodoro_stats(auth.user_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(PomodoroStatsResponse::from(stats)))
}
