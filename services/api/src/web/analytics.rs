//! services/api/src/web/analytics.rs
//!
//! The read-only analytics summary. No independent state: everything is
//! derived on demand from the store, composing the session log, the goal
//! table, and the pomodoro history.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use study_tracker_core::analytics::compute_streaks;
use study_tracker_core::domain::{week_start_for, DateRange};
use utoipa::ToSchema;

use crate::web::goals::GoalProgressResponse;
use crate::web::middleware::AuthUser;
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Response Types
//=========================================================================================

/// Lifetime study time, split the way it was recorded. Pomodoro
/// completion does not create a session-log row, so the two sources
/// are combined here at read time.
#[derive(Serialize, ToSchema)]
pub struct LifetimeTotals {
    pub manual_minutes: i64,
    pub pomodoro_minutes: i64,
    pub combined_minutes: i64,
}

#[derive(Serialize, ToSchema)]
pub struct DistributionEntry {
    pub value: String,
    pub count: i64,
}

#[derive(Serialize, ToSchema)]
pub struct StreakSummary {
    pub current_days: i64,
    pub longest_days: i64,
}

#[derive(Serialize, ToSchema)]
pub struct AnalyticsSummaryResponse {
    pub lifetime: LifetimeTotals,
    pub week_start_date: NaiveDate,
    pub current_week_minutes: i64,
    pub mood_distribution: Vec<DistributionEntry>,
    pub productivity_distribution: Vec<DistributionEntry>,
    pub weekly_goal_progress: Vec<GoalProgressResponse>,
    pub streaks: StreakSummary,
}

//=========================================================================================
// Handler
//=========================================================================================

/// GET /analytics/summary - Composite analytics view
#[utoipa::path(
    get,
    path = "/analytics/summary",
    responses(
        (status = 200, description = "Totals, trends, goal progress, streaks", body = AnalyticsSummaryResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn analytics_summary_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = &state.store;
    let user_id = auth.user_id;
    let today = Utc::now().date_naive();
    let week_start = week_start_for(today);
    let week = DateRange::week(week_start);

    let result = async {
        let manual_minutes = store.total_study_minutes(user_id, None).await?;
        let pomodoro = store.pomodoro_stats(user_id).await?;
        let current_week_minutes = store.total_study_minutes(user_id, Some(week)).await?;
        let moods = store.mood_counts(user_id).await?;
        let productivity = store.productivity_counts(user_id).await?;
        let progress = store.weekly_progress(user_id, week_start).await?;
        let dates = store.study_dates(user_id).await?;
        Ok::<_, study_tracker_core::ports::PortError>((
            manual_minutes,
            pomodoro,
            current_week_minutes,
            moods,
            productivity,
            progress,
            dates,
        ))
    }
    .await;

    let (manual_minutes, pomodoro, current_week_minutes, moods, productivity, progress, dates) =
        result.map_err(port_error_response)?;

    let streaks = compute_streaks(&dates, today);

    let response = AnalyticsSummaryResponse {
        lifetime: LifetimeTotals {
            manual_minutes,
            pomodoro_minutes: pomodoro.completed_minutes,
            combined_minutes: manual_minutes + pomodoro.completed_minutes,
        },
        week_start_date: week_start,
        current_week_minutes,
        mood_distribution: moods
            .into_iter()
            .map(|(mood, count)| DistributionEntry {
                value: mood.as_str().to_string(),
                count,
            })
            .collect(),
        productivity_distribution: productivity
            .into_iter()
            .map(|(level, count)| DistributionEntry {
                value: level.as_str().to_string(),
                count,
            })
            .collect(),
        weekly_goal_progress: progress.into_iter().map(Into::into).collect(),
        streaks: StreakSummary {
            current_days: streaks.current,
            longest_days: streaks.longest,
        },
    };

    Ok(Json(response))
}
