//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StoreService` port from the `core` crate. It handles all interactions
//! with the SQLite database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::error::ErrorKind;
use sqlx::{FromRow, SqlitePool};
use study_tracker_core::analytics::fill_daily_totals;
use study_tracker_core::domain::{
    DailyTotal, DateRange, Friend, FriendRequest, Friendship, FriendshipStatus, GoalProgress,
    Mood, NewStudySession, PomodoroSession, PomodoroStats, PomodoroStatus, Productivity,
    SessionFilter, StudyGoal, StudySession, SubjectTotal, User, UserCredentials,
};
use study_tracker_core::ports::{PortError, PortResult, StoreService};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StoreService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: SqlitePool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps any sqlx failure that is not handled specially to the fatal
/// infrastructure class.
fn infra(e: sqlx::Error) -> PortError {
    PortError::Infrastructure(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|d| d.kind() == ErrorKind::UniqueViolation)
        .unwrap_or(false)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: i64,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: i64,
    username: String,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            hashed_password: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct StudySessionRecord {
    session_id: i64,
    user_id: i64,
    subject: String,
    duration_minutes: i64,
    mood: String,
    productivity: String,
    notes: Option<String>,
    session_date: NaiveDate,
    created_at: DateTime<Utc>,
}
impl StudySessionRecord {
    fn to_domain(self) -> PortResult<StudySession> {
        Ok(StudySession {
            session_id: self.session_id,
            user_id: self.user_id,
            subject: self.subject,
            duration_minutes: self.duration_minutes,
            mood: self.mood.parse()?,
            productivity: self.productivity.parse()?,
            notes: self.notes,
            session_date: self.session_date,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct StudyGoalRecord {
    goal_id: i64,
    user_id: i64,
    subject: String,
    weekly_target_minutes: i64,
    week_start_date: NaiveDate,
    created_at: DateTime<Utc>,
}
impl StudyGoalRecord {
    fn to_domain(self) -> StudyGoal {
        StudyGoal {
            goal_id: self.goal_id,
            user_id: self.user_id,
            subject: self.subject,
            weekly_target_minutes: self.weekly_target_minutes,
            week_start_date: self.week_start_date,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct PomodoroRecord {
    session_id: i64,
    user_id: i64,
    subject: String,
    duration_minutes: i64,
    status: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}
impl PomodoroRecord {
    fn to_domain(self) -> PortResult<PomodoroSession> {
        Ok(PomodoroSession {
            session_id: self.session_id,
            user_id: self.user_id,
            subject: self.subject,
            duration_minutes: self.duration_minutes,
            status: self.status.parse()?,
            started_at: self.started_at,
            completed_at: self.completed_at,
        })
    }
}

const POMODORO_COLUMNS: &str =
    "session_id, user_id, subject, duration_minutes, status, started_at, completed_at";

#[derive(FromRow)]
struct FriendshipRecord {
    friendship_id: i64,
    user_id: i64,
    friend_id: i64,
    status: String,
    requested_at: DateTime<Utc>,
    responded_at: Option<DateTime<Utc>>,
}
impl FriendshipRecord {
    fn to_domain(self) -> PortResult<Friendship> {
        Ok(Friendship {
            friendship_id: self.friendship_id,
            requester_id: self.user_id,
            addressee_id: self.friend_id,
            status: self.status.parse()?,
            requested_at: self.requested_at,
            responded_at: self.responded_at,
        })
    }
}

const FRIENDSHIP_COLUMNS: &str =
    "friendship_id, user_id, friend_id, status, requested_at, responded_at";

//=========================================================================================
// `StoreService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StoreService for DbAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let username = username.trim();
        let email = email.trim();
        if username.is_empty() || email.is_empty() {
            return Err(PortError::Validation(
                "username and email must not be empty".into(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(infra)?;

        // Check first so the error can name the colliding field; the UNIQUE
        // constraints remain the final arbiter under concurrent registration.
        let existing: Option<(String, String)> = sqlx::query_as(
            "SELECT username, email FROM users WHERE username = ?1 OR email = ?2",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        if let Some((existing_username, _)) = existing {
            let field = if existing_username == username {
                "Username"
            } else {
                "Email"
            };
            return Err(PortError::DuplicateIdentity(format!(
                "{} already exists",
                field
            )));
        }

        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (username, email, password_hash, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING user_id, username, email, created_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::DuplicateIdentity("Username or email already exists".into())
            } else {
                infra(e)
            }
        })?;

        tx.commit().await.map_err(infra)?;
        Ok(record.to_domain())
    }

    async fn find_credentials(&self, username_or_email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, username, email, password_hash \
             FROM users WHERE username = ?1 OR email = ?1",
        )
        .bind(username_or_email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::InvalidCredentials,
            _ => infra(e),
        })?;
        Ok(record.to_domain())
    }

    async fn get_user(&self, user_id: i64) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, username, email, created_at FROM users WHERE user_id = ?1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {}", user_id)),
            _ => infra(e),
        })?;
        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<i64> {
        let row: Option<(i64, DateTime<Utc>)> =
            sqlx::query_as("SELECT user_id, expires_at FROM auth_sessions WHERE id = ?1")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(infra)?;

        match row {
            Some((user_id, expires_at)) if expires_at > Utc::now() => Ok(user_id),
            _ => Err(PortError::NotFound("auth session".into())),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = ?1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(infra)?;
        Ok(())
    }

    async fn insert_study_session(
        &self,
        user_id: i64,
        entry: &NewStudySession,
    ) -> PortResult<StudySession> {
        let record = sqlx::query_as::<_, StudySessionRecord>(
            "INSERT INTO study_sessions \
             (user_id, subject, duration_minutes, mood, productivity, notes, session_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
             RETURNING session_id, user_id, subject, duration_minutes, mood, productivity, \
                       notes, session_date, created_at",
        )
        .bind(user_id)
        .bind(&entry.subject)
        .bind(entry.duration_minutes)
        .bind(entry.mood.as_str())
        .bind(entry.productivity.as_str())
        .bind(&entry.notes)
        .bind(entry.session_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        record.to_domain()
    }

    async fn list_study_sessions(
        &self,
        user_id: i64,
        filter: &SessionFilter,
    ) -> PortResult<Vec<StudySession>> {
        // LIMIT -1 means "no limit" in SQLite.
        let records = sqlx::query_as::<_, StudySessionRecord>(
            "SELECT session_id, user_id, subject, duration_minutes, mood, productivity, \
                    notes, session_date, created_at \
             FROM study_sessions \
             WHERE user_id = ?1 \
               AND (?2 IS NULL OR session_date >= ?2) \
               AND (?3 IS NULL OR session_date <= ?3) \
               AND (?4 IS NULL OR subject = ?4) \
             ORDER BY session_date DESC, session_id DESC \
             LIMIT ?5",
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.subject)
        .bind(filter.limit.unwrap_or(-1))
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn delete_study_session(&self, user_id: i64, session_id: i64) -> PortResult<()> {
        let result =
            sqlx::query("DELETE FROM study_sessions WHERE session_id = ?1 AND user_id = ?2")
                .bind(session_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(infra)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!(
                "Study session {}",
                session_id
            )));
        }
        Ok(())
    }

    async fn subject_totals(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> PortResult<Vec<SubjectTotal>> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT subject, SUM(duration_minutes) AS total_minutes, COUNT(*) AS session_count \
             FROM study_sessions \
             WHERE user_id = ?1 \
               AND (?2 IS NULL OR session_date >= ?2) \
               AND (?3 IS NULL OR session_date <= ?3) \
             GROUP BY subject \
             ORDER BY total_minutes DESC",
        )
        .bind(user_id)
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows
            .into_iter()
            .map(|(subject, total_minutes, session_count)| SubjectTotal {
                subject,
                total_minutes,
                session_count,
            })
            .collect())
    }

    async fn daily_totals(&self, user_id: i64, range: DateRange) -> PortResult<Vec<DailyTotal>> {
        let rows: Vec<(NaiveDate, i64)> = sqlx::query_as(
            "SELECT session_date, SUM(duration_minutes) AS total_minutes \
             FROM study_sessions \
             WHERE user_id = ?1 AND session_date BETWEEN ?2 AND ?3 \
             GROUP BY session_date \
             ORDER BY session_date",
        )
        .bind(user_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        let sparse: Vec<DailyTotal> = rows
            .into_iter()
            .map(|(date, total_minutes)| DailyTotal { date, total_minutes })
            .collect();
        Ok(fill_daily_totals(range, &sparse))
    }

    async fn total_study_minutes(
        &self,
        user_id: i64,
        range: Option<DateRange>,
    ) -> PortResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(duration_minutes), 0) \
             FROM study_sessions \
             WHERE user_id = ?1 \
               AND (?2 IS NULL OR session_date >= ?2) \
               AND (?3 IS NULL OR session_date <= ?3)",
        )
        .bind(user_id)
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;
        Ok(total)
    }

    async fn study_dates(&self, user_id: i64) -> PortResult<Vec<NaiveDate>> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(
            "SELECT DISTINCT session_date FROM study_sessions \
             WHERE user_id = ?1 ORDER BY session_date",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;
        Ok(dates)
    }

    async fn mood_counts(&self, user_id: i64) -> PortResult<Vec<(Mood, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT mood, COUNT(*) FROM study_sessions \
             WHERE user_id = ?1 GROUP BY mood ORDER BY COUNT(*) DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        rows.into_iter()
            .map(|(mood, count)| Ok((mood.parse()?, count)))
            .collect()
    }

    async fn productivity_counts(&self, user_id: i64) -> PortResult<Vec<(Productivity, i64)>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT productivity, COUNT(*) FROM study_sessions \
             WHERE user_id = ?1 GROUP BY productivity ORDER BY COUNT(*) DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        rows.into_iter()
            .map(|(productivity, count)| Ok((productivity.parse()?, count)))
            .collect()
    }

    async fn upsert_goal(
        &self,
        user_id: i64,
        subject: &str,
        weekly_target_minutes: i64,
        week_start_date: NaiveDate,
    ) -> PortResult<StudyGoal> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(PortError::Validation("subject must not be empty".into()));
        }
        if weekly_target_minutes <= 0 {
            return Err(PortError::Validation(
                "weekly_target_minutes must be a positive integer".into(),
            ));
        }

        // Native SQLite upsert; concurrent identical upserts serialize on the
        // unique (user_id, subject, week_start_date) constraint.
        let record = sqlx::query_as::<_, StudyGoalRecord>(
            "INSERT INTO study_goals \
             (user_id, subject, weekly_target_minutes, week_start_date, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             ON CONFLICT(user_id, subject, week_start_date) \
             DO UPDATE SET weekly_target_minutes = excluded.weekly_target_minutes \
             RETURNING goal_id, user_id, subject, weekly_target_minutes, week_start_date, created_at",
        )
        .bind(user_id)
        .bind(subject)
        .bind(weekly_target_minutes)
        .bind(week_start_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(infra)?;

        Ok(record.to_domain())
    }

    async fn list_goals(&self, user_id: i64) -> PortResult<Vec<StudyGoal>> {
        let records = sqlx::query_as::<_, StudyGoalRecord>(
            "SELECT goal_id, user_id, subject, weekly_target_minutes, week_start_date, created_at \
             FROM study_goals WHERE user_id = ?1 \
             ORDER BY week_start_date DESC, subject ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn goal_progress(
        &self,
        user_id: i64,
        subject: &str,
        week_start_date: NaiveDate,
    ) -> PortResult<GoalProgress> {
        // Both reads in one transaction so the target and the sum come
        // from the same snapshot.
        let mut tx = self.pool.begin().await.map_err(infra)?;

        let target: Option<i64> = sqlx::query_scalar(
            "SELECT weekly_target_minutes FROM study_goals \
             WHERE user_id = ?1 AND subject = ?2 AND week_start_date = ?3",
        )
        .bind(user_id)
        .bind(subject)
        .bind(week_start_date)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        let target_minutes = target.ok_or_else(|| {
            PortError::NotFound(format!(
                "Goal for {} in the week of {}",
                subject, week_start_date
            ))
        })?;

        let week = DateRange::week(week_start_date);
        let achieved_minutes: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(duration_minutes), 0) FROM study_sessions \
             WHERE user_id = ?1 AND subject = ?2 AND session_date BETWEEN ?3 AND ?4",
        )
        .bind(user_id)
        .bind(subject)
        .bind(week.start)
        .bind(week.end)
        .fetch_one(&mut *tx)
        .await
        .map_err(infra)?;

        tx.commit().await.map_err(infra)?;

        Ok(GoalProgress {
            subject: subject.to_string(),
            week_start_date,
            achieved_minutes,
            target_minutes,
        })
    }

    async fn weekly_progress(
        &self,
        user_id: i64,
        week_start_date: NaiveDate,
    ) -> PortResult<Vec<GoalProgress>> {
        let week = DateRange::week(week_start_date);
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT g.subject, g.weekly_target_minutes, \
                    COALESCE(SUM(s.duration_minutes), 0) AS actual_minutes \
             FROM study_goals g \
             LEFT JOIN study_sessions s ON g.user_id = s.user_id \
                 AND g.subject = s.subject \
                 AND s.session_date BETWEEN ?2 AND ?3 \
             WHERE g.user_id = ?1 AND g.week_start_date = ?2 \
             GROUP BY g.subject, g.weekly_target_minutes \
             ORDER BY g.subject",
        )
        .bind(user_id)
        .bind(week.start)
        .bind(week.end)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows
            .into_iter()
            .map(|(subject, target_minutes, achieved_minutes)| GoalProgress {
                subject,
                week_start_date,
                achieved_minutes,
                target_minutes,
            })
            .collect())
    }

    async fn start_pomodoro(
        &self,
        user_id: i64,
        subject: &str,
        duration_minutes: i64,
    ) -> PortResult<PomodoroSession> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(PortError::Validation("subject must not be empty".into()));
        }
        if duration_minutes <= 0 {
            return Err(PortError::Validation(
                "duration_minutes must be a positive integer".into(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(infra)?;

        let active: Option<i64> = sqlx::query_scalar(
            "SELECT session_id FROM pomodoro_sessions WHERE user_id = ?1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        if active.is_some() {
            return Err(PortError::Conflict(
                "A pomodoro session is already active for this user".into(),
            ));
        }

        // The partial unique index on (user_id) WHERE status = 'active' is
        // the backstop for concurrent starts.
        let record = sqlx::query_as::<_, PomodoroRecord>(&format!(
            "INSERT INTO pomodoro_sessions (user_id, subject, duration_minutes, status, started_at) \
             VALUES (?1, ?2, ?3, 'active', ?4) \
             RETURNING {POMODORO_COLUMNS}"
        ))
        .bind(user_id)
        .bind(subject)
        .bind(duration_minutes)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                PortError::Conflict("A pomodoro session is already active for this user".into())
            } else {
                infra(e)
            }
        })?;

        tx.commit().await.map_err(infra)?;
        record.to_domain()
    }

    async fn complete_pomodoro(
        &self,
        user_id: i64,
        session_id: i64,
    ) -> PortResult<PomodoroSession> {
        self.transition_pomodoro(user_id, session_id, PomodoroStatus::Completed)
            .await
    }

    async fn cancel_pomodoro(&self, user_id: i64, session_id: i64) -> PortResult<PomodoroSession> {
        self.transition_pomodoro(user_id, session_id, PomodoroStatus::Cancelled)
            .await
    }

    async fn active_pomodoro(&self, user_id: i64) -> PortResult<Option<PomodoroSession>> {
        let record = sqlx::query_as::<_, PomodoroRecord>(&format!(
            "SELECT {POMODORO_COLUMNS} FROM pomodoro_sessions \
             WHERE user_id = ?1 AND status = 'active'"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infra)?;

        record.map(|r| r.to_domain()).transpose()
    }

    async fn pomodoro_stats(&self, user_id: i64) -> PortResult<PomodoroStats> {
        let today = Utc::now().date_naive();
        let (completed_sessions, completed_minutes, today_sessions): (i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), \
                        COALESCE(SUM(duration_minutes), 0), \
                        COALESCE(SUM(CASE WHEN DATE(completed_at) = ?2 THEN 1 ELSE 0 END), 0) \
                 FROM pomodoro_sessions \
                 WHERE user_id = ?1 AND status = 'completed'",
            )
            .bind(user_id)
            .bind(today)
            .fetch_one(&self.pool)
            .await
            .map_err(infra)?;

        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT subject, SUM(duration_minutes) AS minutes, COUNT(*) AS sessions \
             FROM pomodoro_sessions \
             WHERE user_id = ?1 AND status = 'completed' \
             GROUP BY subject \
             ORDER BY minutes DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(PomodoroStats {
            completed_sessions,
            completed_minutes,
            today_sessions,
            subjects: rows
                .into_iter()
                .map(|(subject, total_minutes, session_count)| SubjectTotal {
                    subject,
                    total_minutes,
                    session_count,
                })
                .collect(),
        })
    }

    async fn recent_pomodoros(
        &self,
        user_id: i64,
        limit: i64,
    ) -> PortResult<Vec<PomodoroSession>> {
        if limit <= 0 {
            return Err(PortError::Validation(
                "limit must be a positive integer".into(),
            ));
        }

        let records = sqlx::query_as::<_, PomodoroRecord>(&format!(
            "SELECT {POMODORO_COLUMNS} FROM pomodoro_sessions \
             WHERE user_id = ?1 AND status = 'completed' \
             ORDER BY started_at DESC, session_id DESC \
             LIMIT ?2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn send_friend_request(
        &self,
        user_id: i64,
        friend_username: &str,
    ) -> PortResult<Friendship> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        let friend_id: Option<i64> =
            sqlx::query_scalar("SELECT user_id FROM users WHERE username = ?1")
                .bind(friend_username)
                .fetch_optional(&mut *tx)
                .await
                .map_err(infra)?;

        let friend_id = friend_id
            .ok_or_else(|| PortError::NotFound(format!("User {}", friend_username)))?;

        if friend_id == user_id {
            return Err(PortError::Validation(
                "cannot add yourself as a friend".into(),
            ));
        }

        // One row per pair, in either direction.
        let existing: Option<(i64, String)> = sqlx::query_as(
            "SELECT friendship_id, status FROM friendships \
             WHERE (user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1)",
        )
        .bind(user_id)
        .bind(friend_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        let record = match existing {
            Some((_, status)) if status == "accepted" => {
                return Err(PortError::Conflict("Already friends".into()));
            }
            Some((_, status)) if status == "pending" => {
                return Err(PortError::Conflict(
                    "Friend request already pending".into(),
                ));
            }
            // A rejected pair may be asked again; the row flips back to
            // pending with the current requester.
            Some((friendship_id, _)) => {
                sqlx::query_as::<_, FriendshipRecord>(&format!(
                    "UPDATE friendships \
                     SET user_id = ?1, friend_id = ?2, status = 'pending', \
                         requested_at = ?3, responded_at = NULL \
                     WHERE friendship_id = ?4 \
                     RETURNING {FRIENDSHIP_COLUMNS}"
                ))
                .bind(user_id)
                .bind(friend_id)
                .bind(Utc::now())
                .bind(friendship_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(infra)?
            }
            None => sqlx::query_as::<_, FriendshipRecord>(&format!(
                "INSERT INTO friendships (user_id, friend_id, status, requested_at) \
                 VALUES (?1, ?2, 'pending', ?3) \
                 RETURNING {FRIENDSHIP_COLUMNS}"
            ))
            .bind(user_id)
            .bind(friend_id)
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PortError::Conflict("Friend request already pending".into())
                } else {
                    infra(e)
                }
            })?,
        };

        tx.commit().await.map_err(infra)?;
        record.to_domain()
    }

    async fn respond_to_friend_request(
        &self,
        user_id: i64,
        friendship_id: i64,
        accept: bool,
    ) -> PortResult<Friendship> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        // Only the addressee of a still-pending request may answer it.
        let pending: Option<i64> = sqlx::query_scalar(
            "SELECT friendship_id FROM friendships \
             WHERE friendship_id = ?1 AND friend_id = ?2 AND status = 'pending'",
        )
        .bind(friendship_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        if pending.is_none() {
            return Err(PortError::NotFound(format!(
                "Friend request {}",
                friendship_id
            )));
        }

        let status = if accept {
            FriendshipStatus::Accepted
        } else {
            FriendshipStatus::Rejected
        };

        let record = sqlx::query_as::<_, FriendshipRecord>(&format!(
            "UPDATE friendships SET status = ?1, responded_at = ?2 \
             WHERE friendship_id = ?3 \
             RETURNING {FRIENDSHIP_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(friendship_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(infra)?;

        tx.commit().await.map_err(infra)?;
        record.to_domain()
    }

    async fn pending_friend_requests(&self, user_id: i64) -> PortResult<Vec<FriendRequest>> {
        let rows: Vec<(i64, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT f.friendship_id, u.username, f.requested_at \
             FROM friendships f \
             JOIN users u ON f.user_id = u.user_id \
             WHERE f.friend_id = ?1 AND f.status = 'pending' \
             ORDER BY f.requested_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows
            .into_iter()
            .map(|(friendship_id, username, requested_at)| FriendRequest {
                friendship_id,
                username,
                requested_at,
            })
            .collect())
    }

    async fn list_friends(&self, user_id: i64) -> PortResult<Vec<Friend>> {
        let rows: Vec<(i64, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT u.user_id, u.username, COALESCE(f.responded_at, f.requested_at) \
             FROM friendships f \
             JOIN users u ON u.user_id = \
                 CASE WHEN f.user_id = ?1 THEN f.friend_id ELSE f.user_id END \
             WHERE (f.user_id = ?1 OR f.friend_id = ?1) AND f.status = 'accepted' \
             ORDER BY u.username",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(infra)?;

        Ok(rows
            .into_iter()
            .map(|(user_id, username, friends_since)| Friend {
                user_id,
                username,
                friends_since,
            })
            .collect())
    }

    async fn remove_friend(&self, user_id: i64, friend_id: i64) -> PortResult<()> {
        let result = sqlx::query(
            "DELETE FROM friendships \
             WHERE status = 'accepted' \
               AND ((user_id = ?1 AND friend_id = ?2) OR (user_id = ?2 AND friend_id = ?1))",
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await
        .map_err(infra)?;

        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("Friend {}", friend_id)));
        }
        Ok(())
    }
}

impl DbAdapter {
    /// Moves a pomodoro session from `active` into a terminal state. Both
    /// terminal states record `completed_at` as the moment the interval ended.
    async fn transition_pomodoro(
        &self,
        user_id: i64,
        session_id: i64,
        target: PomodoroStatus,
    ) -> PortResult<PomodoroSession> {
        let mut tx = self.pool.begin().await.map_err(infra)?;

        let current: Option<String> = sqlx::query_scalar(
            "SELECT status FROM pomodoro_sessions WHERE session_id = ?1 AND user_id = ?2",
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(infra)?;

        let current: PomodoroStatus = current
            .ok_or_else(|| PortError::NotFound(format!("Pomodoro session {}", session_id)))?
            .parse()?;

        if current != PomodoroStatus::Active {
            return Err(PortError::InvalidTransition(format!(
                "Pomodoro session {} is already {}",
                session_id, current
            )));
        }

        let record = sqlx::query_as::<_, PomodoroRecord>(&format!(
            "UPDATE pomodoro_sessions SET status = ?1, completed_at = ?2 \
             WHERE session_id = ?3 \
             RETURNING {POMODORO_COLUMNS}"
        ))
        .bind(target.as_str())
        .bind(Utc::now())
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(infra)?;

        tx.commit().await.map_err(infra)?;
        record.to_domain()
    }
}
