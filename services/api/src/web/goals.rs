//! services/api/src/web/goals.rs
//!
//! Weekly goal endpoints: upsert, listing, and progress.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::domain::{week_start_for, GoalProgress, StudyGoal};
use utoipa::{IntoParams, ToSchema};

use crate::web::middleware::AuthUser;
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SetGoalRequest {
    pub subject: String,
    pub weekly_target_minutes: i64,
    /// Defaults to the Monday of the current week when omitted.
    pub week_start_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct GoalResponse {
    pub goal_id: i64,
    pub subject: String,
    pub weekly_target_minutes: i64,
    pub week_start_date: NaiveDate,
}

impl From<StudyGoal> for GoalResponse {
    fn from(g: StudyGoal) -> Self {
        Self {
            goal_id: g.goal_id,
            subject: g.subject,
            weekly_target_minutes: g.weekly_target_minutes,
            week_start_date: g.week_start_date,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GoalProgressResponse {
    pub subject: String,
    pub week_start_date: NaiveDate,
    pub achieved_minutes: i64,
    pub target_minutes: i64,
    /// Uncapped: beating the target reports more than 100.
    pub percentage: f64,
}

impl From<GoalProgress> for GoalProgressResponse {
    fn from(p: GoalProgress) -> Self {
        let percentage = p.percentage();
        Self {
            subject: p.subject,
            week_start_date: p.week_start_date,
            achieved_minutes: p.achieved_minutes,
            target_minutes: p.target_minutes,
            percentage,
        }
    }
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProgressQuery {
    pub subject: String,
    /// Defaults to the Monday of the current week when omitted.
    pub week_start_date: Option<NaiveDate>,
}

fn default_week_start(explicit: Option<NaiveDate>) -> NaiveDate {
    explicit.unwrap_or_else(|| week_start_for(Utc::now().date_naive()))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// PUT /goals - Create or update a weekly goal
///
/// Upsert keyed by (user, subject, week start): re-setting a goal for the
/// same week replaces the target instead of duplicating the row.
#[utoipa::path(
    put,
    path = "/goals",
    request_body = SetGoalRequest,
    responses(
        (status = 200, description = "Goal created or updated", body = GoalResponse),
        (status = 400, description = "Invalid target or subject"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn set_goal_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SetGoalRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let week_start = default_week_start(req.week_start_date);

    let goal = state
        .store
        .upsert_goal(
            auth.user_id,
            &req.subject,
            req.weekly_target_minutes,
            week_start,
        )
        .await
        .map_err(port_error_response)?;

    Ok(Json(GoalResponse::from(goal)))
}

/// GET /goals - All goals for the user, newest week first
#[utoipa::path(
    get,
    path = "/goals",
    responses(
        (status = 200, description = "The user's goals", body = [GoalResponse]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_goals_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let goals = state
        .store
        .list_goals(auth.user_id)
        .await
        .map_err(port_error_response)?;

    let response: Vec<GoalResponse> = goals.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// GET /goals/progress - Progress for one goal's week
#[utoipa::path(
    get,
    path = "/goals/progress",
    params(ProgressQuery),
    responses(
        (status = 200, description = "Achieved vs target for the week", body = GoalProgressResponse),
        (status = 404, description = "No goal for that subject and week"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn goal_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let week_start = default_week_start(query.week_start_date);

    let progress = state
        .store
        .goal_progress(auth.user_id, &query.subject, week_start)
        .await
        .map_err(port_error_response)?;

    Ok(Json(GoalProgressResponse::from(progress)))
}
