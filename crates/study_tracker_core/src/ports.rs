//! crates/study_tracker_core/src/ports.rs
//!
//! Defines the service contract (trait) for the application's core logic.
//! The trait forms the boundary of the hexagonal architecture, keeping the
//! core independent of the concrete persistent store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::{
    DailyTotal, DateRange, Friend, FriendRequest, Friendship, GoalProgress, Mood, NewStudySession,
    PomodoroSession, PomodoroStats, Productivity, SessionFilter, StudyGoal, StudySession,
    SubjectTotal, User, UserCredentials,
};

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by all port operations. Every failure a
/// handler can see is one of these variants; the web layer maps each to
/// an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Malformed input: bad enum value, non-positive duration or target,
    /// empty required field.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Username or email collision at registration.
    #[error("{0}")]
    DuplicateIdentity(String),

    /// Unknown user or password mismatch.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The referenced entity does not exist or is not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation clashes with existing state, e.g. starting a second
    /// active pomodoro.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A pomodoro lifecycle action applied to a session that is not active.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Store connectivity or query failure. Fatal to the current request.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Store Port (Trait)
//=========================================================================================

#[async_trait]
pub trait StoreService: Send + Sync {
    // --- Account Management ---
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User>;

    /// Looks up credentials by username or email, for authentication.
    async fn find_credentials(&self, username_or_email: &str) -> PortResult<UserCredentials>;

    async fn get_user(&self, user_id: i64) -> PortResult<User>;

    // --- Auth Sessions ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the user id behind an unexpired auth session.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Study Session Log ---
    async fn insert_study_session(
        &self,
        user_id: i64,
        entry: &NewStudySession,
    ) -> PortResult<StudySession>;

    /// Sessions ordered by date descending, creation order breaking ties.
    async fn list_study_sessions(
        &self,
        user_id: i64,
        filter: &SessionFilter,
    ) -> PortResult<Vec<StudySession>>;

    async fn delete_study_session(&self, user_id: i64, session_id: i64) -> PortResult<()>;

    /// Subject totals sorted by total minutes descending.
    async fn subject_totals(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> PortResult<Vec<SubjectTotal>>;

    /// One entry per calendar day in `range`, zero-filled.
    async fn daily_totals(&self, user_id: i64, range: DateRange) -> PortResult<Vec<DailyTotal>>;

    async fn total_study_minutes(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> PortResult<i64>;

    /// Distinct dates with at least one logged session, ascending.
    async fn study_dates(&self, user_id: i64) -> PortResult<Vec<NaiveDate>>;

    async fn mood_counts(&self, user_id: i64) -> PortResult<Vec<(Mood, i64)>>;

    async fn productivity_counts(&self, user_id: i64) -> PortResult<Vec<(Productivity, i64)>>;

    // --- Weekly Goals ---
    /// Atomic upsert keyed by (user, subject, week start).
    async fn upsert_goal(
        &self,
        user_id: i64,
        subject: &str,
        weekly_target_minutes: i64,
        week_start_date: NaiveDate,
    ) -> PortResult<StudyGoal>;

    async fn list_goals(&self, user_id: i64) -> PortResult<Vec<StudyGoal>>;

    async fn goal_progress(
        &self,
        user_id: i64,
        subject: &str,
        week_start_date: NaiveDate,
    ) -> PortResult<GoalProgress>;

    /// Progress for every goal anchored at `week_start_date`.
    async fn weekly_progress(
        &self,
        user_id: i64,
        week_start_date: NaiveDate,
    ) -> PortResult<Vec<GoalProgress>>;

    // --- Pomodoro Sessions ---
    async fn start_pomodoro(
        &self,
        user_id: i64,
        subject: &str,
        duration_minutes: i64,
    ) -> PortResult<PomodoroSession>;

    async fn complete_pomodoro(&self, user_id: i64, session_id: i64)
        -> PortResult<PomodoroSession>;

    async fn cancel_pomodoro(&self, user_id: i64, session_id: i64)
        -> PortResult<PomodoroSession>;

    async fn active_pomodoro(&self, user_id: i64) -> PortResult<Option<PomodoroSession>>;

    async fn pomodoro_stats(&self, user_id: i64) -> PortResult<PomodoroStats>;

    /// Completed sessions, most recently started first.
    async fn recent_pomodoros(&self, user_id: i64, limit: i64)
        -> PortResult<Vec<PomodoroSession>>;

    // --- Friendships ---
    /// Sends a request to the named user. A rejected pair may be asked
    /// again; a pending or accepted pair may not.
    async fn send_friend_request(
        &self,
        user_id: i64,
        friend_username: &str,
    ) -> PortResult<Friendship>;

    /// Accepts or rejects a pending request addressed to `user_id`.
    async fn respond_to_friend_request(
        &self,
        user_id: i64,
        friendship_id: i64,
        accept: bool,
    ) -> PortResult<Friendship>;

    /// Pending requests received by `user_id`, newest first.
    async fn pending_friend_requests(&self, user_id: i64) -> PortResult<Vec<FriendRequest>>;

    /// Accepted friends in either direction.
    async fn list_friends(&self, user_id: i64) -> PortResult<Vec<Friend>>;

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> PortResult<()>;
}
