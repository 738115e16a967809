//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification. Handlers live in
//! their own modules; this aggregates their annotations.

use utoipa::OpenApi;

use crate::web::{analytics, auth, friends, goals, pomodoro, sessions};

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        sessions::log_session_handler,
        sessions::list_sessions_handler,
        sessions::delete_session_handler,
        sessions::subject_summary_handler,
        sessions::daily_summary_handler,
        goals::set_goal_handler,
        goals::list_goals_handler,
        goals::goal_progress_handler,
        pomodoro::start_pomodoro_handler,
        pomodoro::complete_pomodoro_handler,
        pomodoro::cancel_pomodoro_handler,
        pomodoro::current_pomodoro_handler,
        pomodoro::recent_pomodoros_handler,
        pomodoro::pomodoro_stats_handler,
        friends::send_friend_request_handler,
        friends::respond_friend_request_handler,
        friends::pending_requests_handler,
        friends::list_friends_handler,
        friends::remove_friend_handler,
        analytics::analytics_summary_handler,
    ),
    components(
        schemas(
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            sessions::LogSessionRequest,
            sessions::SessionResponse,
            sessions::SubjectTotalResponse,
            sessions::DailyTotalResponse,
            goals::SetGoalRequest,
            goals::GoalResponse,
            goals::GoalProgressResponse,
            pomodoro::StartPomodoroRequest,
            pomodoro::PomodoroResponse,
            pomodoro::PomodoroStatsResponse,
            friends::SendFriendRequestBody,
            friends::RespondRequestBody,
            friends::FriendshipResponse,
            friends::FriendRequestResponse,
            friends::FriendResponse,
            analytics::AnalyticsSummaryResponse,
            analytics::LifetimeTotals,
            analytics::DistributionEntry,
            analytics::StreakSummary,
        )
    ),
    tags(
        (name = "Study Tracker API", description = "Accounts, study sessions, weekly goals, pomodoro timing, and analytics.")
    )
)]
pub struct ApiDoc;
