//! crates/study_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ports::{PortError, PortResult};

/// Default length of a focus interval, in minutes.
pub const DEFAULT_POMODORO_MINUTES: i64 = 25;

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// How the user felt during a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Excellent, Mood::Good, Mood::Fair, Mood::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Excellent => "excellent",
            Mood::Good => "good",
            Mood::Fair => "fair",
            Mood::Poor => "poor",
        }
    }
}

impl FromStr for Mood {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(Mood::Excellent),
            "good" => Ok(Mood::Good),
            "fair" => Ok(Mood::Fair),
            "poor" => Ok(Mood::Poor),
            other => Err(PortError::Validation(format!(
                "'{}' is not a valid mood (expected one of excellent, good, fair, poor)",
                other
            ))),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-assessed productivity of a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Productivity {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Productivity {
    pub const ALL: [Productivity; 5] = [
        Productivity::VeryHigh,
        Productivity::High,
        Productivity::Medium,
        Productivity::Low,
        Productivity::VeryLow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Productivity::VeryHigh => "very_high",
            Productivity::High => "high",
            Productivity::Medium => "medium",
            Productivity::Low => "low",
            Productivity::VeryLow => "very_low",
        }
    }
}

impl FromStr for Productivity {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_high" => Ok(Productivity::VeryHigh),
            "high" => Ok(Productivity::High),
            "medium" => Ok(Productivity::Medium),
            "low" => Ok(Productivity::Low),
            "very_low" => Ok(Productivity::VeryLow),
            other => Err(PortError::Validation(format!(
                "'{}' is not a valid productivity level \
                 (expected one of very_high, high, medium, low, very_low)",
                other
            ))),
        }
    }
}

impl fmt::Display for Productivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a pomodoro session. `Completed` and `Cancelled`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroStatus {
    Active,
    Completed,
    Cancelled,
}

impl PomodoroStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroStatus::Active => "active",
            PomodoroStatus::Completed => "completed",
            PomodoroStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PomodoroStatus::Completed | PomodoroStatus::Cancelled)
    }
}

impl FromStr for PomodoroStatus {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(PomodoroStatus::Active),
            "completed" => Ok(PomodoroStatus::Completed),
            "cancelled" => Ok(PomodoroStatus::Cancelled),
            other => Err(PortError::Validation(format!(
                "'{}' is not a valid pomodoro status",
                other
            ))),
        }
    }
}

impl fmt::Display for PomodoroStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logged study session. Immutable once created, except for deletion.
#[derive(Debug, Clone)]
pub struct StudySession {
    pub session_id: i64,
    pub user_id: i64,
    pub subject: String,
    pub duration_minutes: i64,
    pub mood: Mood,
    pub productivity: Productivity,
    pub notes: Option<String>,
    pub session_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A validated study-session entry, ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewStudySession {
    pub subject: String,
    pub duration_minutes: i64,
    pub mood: Mood,
    pub productivity: Productivity,
    pub notes: Option<String>,
    pub session_date: NaiveDate,
}

impl NewStudySession {
    /// Validates the raw field values once at the boundary. Enum fields
    /// arrive as strings and leave as typed variants.
    pub fn new(
        subject: &str,
        duration_minutes: i64,
        mood: &str,
        productivity: &str,
        notes: Option<String>,
        session_date: NaiveDate,
    ) -> PortResult<Self> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Err(PortError::Validation("subject must not be empty".into()));
        }
        if duration_minutes <= 0 {
            return Err(PortError::Validation(
                "duration_minutes must be a positive integer".into(),
            ));
        }
        Ok(Self {
            subject: subject.to_string(),
            duration_minutes,
            mood: mood.parse()?,
            productivity: productivity.parse()?,
            notes: notes.filter(|n| !n.trim().is_empty()),
            session_date,
        })
    }
}

/// Optional filters for listing study sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub subject: Option<String>,
    pub limit: Option<i64>,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> PortResult<Self> {
        if end < start {
            return Err(PortError::Validation(format!(
                "date range end {} precedes start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The 7-day goal window anchored at `week_start`.
    pub fn week(week_start: NaiveDate) -> Self {
        Self {
            start: week_start,
            end: week_start + Duration::days(6),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let start = self.start;
        let count = (self.end - self.start).num_days() + 1;
        (0..count).map(move |offset| start + Duration::days(offset))
    }
}

/// The Monday anchoring the week that contains `date`.
pub fn week_start_for(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// A weekly study goal, unique per (user, subject, week start).
#[derive(Debug, Clone)]
pub struct StudyGoal {
    pub goal_id: i64,
    pub user_id: i64,
    pub subject: String,
    pub weekly_target_minutes: i64,
    pub week_start_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Progress against one weekly goal.
#[derive(Debug, Clone)]
pub struct GoalProgress {
    pub subject: String,
    pub week_start_date: NaiveDate,
    pub achieved_minutes: i64,
    pub target_minutes: i64,
}

impl GoalProgress {
    /// Percentage of the target achieved. Deliberately uncapped: a week
    /// that beats its target reports more than 100%.
    pub fn percentage(&self) -> f64 {
        if self.target_minutes <= 0 {
            return 0.0;
        }
        self.achieved_minutes as f64 / self.target_minutes as f64 * 100.0
    }
}

/// A timed focus interval bounded by start/complete/cancel actions.
#[derive(Debug, Clone)]
pub struct PomodoroSession {
    pub session_id: i64,
    pub user_id: i64,
    pub subject: String,
    pub duration_minutes: i64,
    pub status: PomodoroStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Lifecycle of a friend request. `Accepted` and `Rejected` are set by
/// the addressee; a rejected request may be sent again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for FriendshipStatus {
    type Err = PortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            "rejected" => Ok(FriendshipStatus::Rejected),
            other => Err(PortError::Validation(format!(
                "'{}' is not a valid friendship status",
                other
            ))),
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A friendship edge between two users, created by a request from the
/// requester to the addressee. At most one row per user pair.
#[derive(Debug, Clone)]
pub struct Friendship {
    pub friendship_id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: FriendshipStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// An incoming pending request, carrying the requester's name for display.
#[derive(Debug, Clone)]
pub struct FriendRequest {
    pub friendship_id: i64,
    pub username: String,
    pub requested_at: DateTime<Utc>,
}

/// An accepted friend.
#[derive(Debug, Clone)]
pub struct Friend {
    pub user_id: i64,
    pub username: String,
    pub friends_since: DateTime<Utc>,
}

/// Total logged minutes and session count for one subject.
#[derive(Debug, Clone)]
pub struct SubjectTotal {
    pub subject: String,
    pub total_minutes: i64,
    pub session_count: i64,
}

/// Logged minutes on one calendar day. Zero-minute days are included
/// when aggregating over a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_minutes: i64,
}

/// Completed-pomodoro statistics for a user.
#[derive(Debug, Clone)]
pub struct PomodoroStats {
    pub completed_sessions: i64,
    pub completed_minutes: i64,
    pub today_sessions: i64,
    pub subjects: Vec<SubjectTotal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mood_round_trips_through_strings() {
        for mood in Mood::ALL {
            assert_eq!(mood.as_str().parse::<Mood>().unwrap(), mood);
        }
        assert!(matches!(
            "meh".parse::<Mood>(),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn productivity_rejects_unknown_levels() {
        for level in Productivity::ALL {
            assert_eq!(level.as_str().parse::<Productivity>().unwrap(), level);
        }
        assert!(matches!(
            "extreme".parse::<Productivity>(),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn new_session_rejects_bad_input() {
        let date = day(2024, 1, 1);
        assert!(matches!(
            NewStudySession::new("", 45, "good", "high", None, date),
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            NewStudySession::new("Math", 0, "good", "high", None, date),
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            NewStudySession::new("Math", -5, "good", "high", None, date),
            Err(PortError::Validation(_))
        ));
        assert!(matches!(
            NewStudySession::new("Math", 45, "splendid", "high", None, date),
            Err(PortError::Validation(_))
        ));
    }

    #[test]
    fn new_session_trims_subject_and_blank_notes() {
        let entry = NewStudySession::new(
            "  Math ",
            45,
            "good",
            "high",
            Some("   ".to_string()),
            day(2024, 1, 1),
        )
        .unwrap();
        assert_eq!(entry.subject, "Math");
        assert_eq!(entry.notes, None);
        assert_eq!(entry.mood, Mood::Good);
        assert_eq!(entry.productivity, Productivity::High);
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        assert!(DateRange::new(day(2024, 1, 2), day(2024, 1, 1)).is_err());
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 1)).unwrap();
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn week_window_spans_seven_days() {
        let week = DateRange::week(day(2024, 1, 1));
        assert!(week.contains(day(2024, 1, 1)));
        assert!(week.contains(day(2024, 1, 7)));
        assert!(!week.contains(day(2024, 1, 8)));
        assert_eq!(week.days().count(), 7);
    }

    #[test]
    fn week_start_is_the_monday_of_the_week() {
        // 2024-01-04 was a Thursday.
        assert_eq!(week_start_for(day(2024, 1, 4)), day(2024, 1, 1));
        // Mondays anchor themselves.
        assert_eq!(week_start_for(day(2024, 1, 1)), day(2024, 1, 1));
        assert_eq!(week_start_for(day(2024, 1, 7)), day(2024, 1, 1));
    }

    #[test]
    fn goal_percentage_is_uncapped() {
        let progress = GoalProgress {
            subject: "Math".into(),
            week_start_date: day(2024, 1, 1),
            achieved_minutes: 75,
            target_minutes: 300,
        };
        assert_eq!(progress.percentage(), 25.0);

        let over = GoalProgress {
            achieved_minutes: 400,
            target_minutes: 300,
            ..progress
        };
        assert!((over.percentage() - 133.333).abs() < 0.001);
    }
}
