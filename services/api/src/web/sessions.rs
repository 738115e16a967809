//! services/api/src/web/sessions.rs
//!
//! Endpoints for the study-session log: logging, listing, deleting, and
//! the per-subject / per-day aggregate views.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::domain::{
    DailyTotal, DateRange, NewStudySession, SessionFilter, StudySession, SubjectTotal,
};
use study_tracker_core::ports::PortError;
use utoipa::{IntoParams, ToSchema};

use crate::web::middleware::AuthUser;
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LogSessionRequest {
    pub subject: String,
    pub duration_minutes: i64,
    /// One of: excellent, good, fair, poor.
    pub mood: String,
    /// One of: very_high, high, medium, low, very_low.
    pub productivity: String,
    pub notes: Option<String>,
    /// Defaults to today when omitted.
    pub session_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: i64,
    pub subject: String,
    pub duration_minutes: i64,
    pub mood: String,
    pub productivity: String,
    pub notes: Option<String>,
    pub session_date: NaiveDate,
}

impl From<StudySession> for SessionResponse {
    fn from(s: StudySession) -> Self {
        Self {
            session_id: s.session_id,
            subject: s.subject,
            duration_minutes: s.duration_minutes,
            mood: s.mood.as_str().to_string(),
            productivity: s.productivity.as_str().to_string(),
            notes: s.notes,
            session_date: s.session_date,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListSessionsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subject: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct SubjectTotalResponse {
    pub subject: String,
    pub total_minutes: i64,
    pub session_count: i64,
}

impl From<SubjectTotal> for SubjectTotalResponse {
    fn from(t: SubjectTotal) -> Self {
        Self {
            subject: t.subject,
            total_minutes: t.total_minutes,
            session_count: t.session_count,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct DailyTotalResponse {
    pub date: NaiveDate,
    pub total_minutes: i64,
}

impl From<DailyTotal> for DailyTotalResponse {
    fn from(t: DailyTotal) -> Self {
        Self {
            date: t.date,
            total_minutes: t.total_minutes,
        }
    }
}

/// Builds an optional range from optional bounds. A half-open query
/// (only one bound) is rejected rather than guessed at.
fn optional_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Option<DateRange>, PortError> {
    match (from, to) {
        (Some(start), Some(end)) => DateRange::new(start, end).map(Some),
        (None, None) => Ok(None),
        _ => Err(PortError::Validation(
            "provide both 'from' and 'to', or neither".into(),
        )),
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /sessions - Log a study session
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = LogSessionRequest,
    responses(
        (status = 201, description = "Session logged", body = SessionResponse),
        (status = 400, description = "Invalid field value"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn log_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<LogSessionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_date = req.session_date.unwrap_or_else(|| Utc::now().date_naive());
    let entry = NewStudySession::new(
        &req.subject,
        req.duration_minutes,
        &req.mood,
        &req.productivity,
        req.notes,
        session_date,
    )
    .map_err(port_error_response)?;

    let session = state
        .store
        .insert_study_session(auth.user_id, &entry)
        .await
        .map_err(port_error_response)?;

    Ok((StatusCode::CREATED, Json(SessionResponse::from(session))))
}

/// GET /sessions - List study sessions, newest first
#[utoipa::path(
    get,
    path = "/sessions",
    params(ListSessionsQuery),
    responses(
        (status = 200, description = "Sessions ordered by date descending", body = [SessionResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_sessions_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let filter = SessionFilter {
        from: query.from,
        to: query.to,
        subject: query.subject,
        limit: query.limit,
    };

    let sessions = state
        .store
        .list_study_sessions(auth.user_id, &filter)
        .await
        .map_err(port_error_response)?;

    let response: Vec<SessionResponse> = sessions.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// DELETE /sessions/{id} - Delete an owned study session
#[utoipa::path(
    delete,
    path = "/sessions/{id}",
    params(("id" = i64, Path, description = "The session to delete")),
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "No such session for this user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .store
        .delete_study_session(auth.user_id, id)
        .await
        .map_err(port_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sessions/summary/subjects - Total minutes per subject
#[utoipa::path(
    get,
    path = "/sessions/summary/subjects",
    params(RangeQuery),
    responses(
        (status = 200, description = "Subject totals, largest first", body = [SubjectTotalResponse]),
        (status = 400, description = "Invalid range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn subject_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let range = optional_range(query.from, query.to).map_err(port_error_response)?;

    let totals = state
        .store
        .subject_totals(auth.user_id, range)
        .await
        .map_err(port_error_response)?;

    let response: Vec<SubjectTotalResponse> = totals.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// GET /sessions/summary/daily - Minutes per calendar day, zero-filled
///
/// Defaults to the last 30 days when no range is given.
#[utoipa::path(
    get,
    path = "/sessions/summary/daily",
    params(RangeQuery),
    responses(
        (status = 200, description = "One entry per day in range", body = [DailyTotalResponse]),
        (status = 400, description = "Invalid range"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn daily_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let today = Utc::now().date_naive();
    let range = match optional_range(query.from, query.to).map_err(port_error_response)? {
        Some(range) => range,
        None => DateRange::new(today - Duration::days(29), today).map_err(port_error_response)?,
    };

    let totals = state
        .store
        .daily_totals(auth.user_id, range)
        .await
        .map_err(port_error_response)?;

    let response: Vec<DailyTotalResponse> = totals.into_iter().map(Into::into).collect();
    Ok(Json(response))
}
