pub mod analytics;
pub mod domain;
pub mod ports;

pub use analytics::{compute_streaks, fill_daily_totals, Streaks};
pub use domain::{
    AuthSession, DailyTotal, DateRange, Friend, FriendRequest, Friendship, FriendshipStatus,
    GoalProgress, Mood, NewStudySession, PomodoroSession, PomodoroStats, PomodoroStatus,
    Productivity, SessionFilter, StudyGoal, StudySession, SubjectTotal, User, UserCredentials,
};
pub use ports::{PortError, PortResult, StoreService};
