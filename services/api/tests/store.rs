//! Integration tests for the SQLite store adapter, run against an
//! in-memory database with the real migrations applied.

use api_lib::adapters::db::DbAdapter;
use chrono::{Duration, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use study_tracker_core::domain::{
    DateRange, FriendshipStatus, NewStudySession, PomodoroStatus, SessionFilter,
};
use study_tracker_core::ports::{PortError, StoreService};

/// A fresh adapter over an in-memory database. One connection only, so
/// the in-memory database is shared across every query in the test.
async fn adapter() -> DbAdapter {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();
    let store = DbAdapter::new(pool);
    store.run_migrations().await.unwrap();
    store
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn session(subject: &str, minutes: i64, date: NaiveDate) -> NewStudySession {
    NewStudySession::new(subject, minutes, "good", "high", None, date).unwrap()
}

//=========================================================================================
// Accounts
//=========================================================================================

#[tokio::test]
async fn register_assigns_sequential_ids_and_rejects_duplicates() {
    let store = adapter().await;

    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    assert_eq!(alice.user_id, 1);
    assert_eq!(alice.username, "alice");

    // Same username, different email.
    let err = store.create_user("alice", "other@x.com", "pw-hash").await.unwrap_err();
    match err {
        PortError::DuplicateIdentity(msg) => assert!(msg.contains("Username")),
        other => panic!("expected DuplicateIdentity, got {:?}", other),
    }

    // Same email, different username.
    let err = store.create_user("alicia", "a@x.com", "pw-hash").await.unwrap_err();
    match err {
        PortError::DuplicateIdentity(msg) => assert!(msg.contains("Email")),
        other => panic!("expected DuplicateIdentity, got {:?}", other),
    }

    // The failed attempts left no partial rows behind.
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();
    assert_eq!(bob.user_id, 2);
}

#[tokio::test]
async fn credentials_match_username_or_email() {
    let store = adapter().await;
    store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let by_name = store.find_credentials("alice").await.unwrap();
    let by_email = store.find_credentials("a@x.com").await.unwrap();
    assert_eq!(by_name.user_id, by_email.user_id);
    assert_eq!(by_name.hashed_password, "pw-hash");

    assert!(matches!(
        store.find_credentials("nobody").await,
        Err(PortError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn auth_sessions_expire() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    store
        .create_auth_session("live", user.user_id, Utc::now() + Duration::days(30))
        .await
        .unwrap();
    store
        .create_auth_session("stale", user.user_id, Utc::now() - Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(store.validate_auth_session("live").await.unwrap(), user.user_id);
    assert!(store.validate_auth_session("stale").await.is_err());
    assert!(store.validate_auth_session("unknown").await.is_err());

    store.delete_auth_session("live").await.unwrap();
    assert!(store.validate_auth_session("live").await.is_err());
}

//=========================================================================================
// Study session log
//=========================================================================================

#[tokio::test]
async fn subject_totals_accumulate_per_subject() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    store
        .insert_study_session(user.user_id, &session("Math", 45, day(2024, 1, 1)))
        .await
        .unwrap();
    store
        .insert_study_session(user.user_id, &session("Math", 30, day(2024, 1, 2)))
        .await
        .unwrap();
    store
        .insert_study_session(user.user_id, &session("Physics", 20, day(2024, 1, 2)))
        .await
        .unwrap();

    let totals = store.subject_totals(user.user_id, None).await.unwrap();
    assert_eq!(totals.len(), 2);
    // Sorted by total descending.
    assert_eq!(totals[0].subject, "Math");
    assert_eq!(totals[0].total_minutes, 75);
    assert_eq!(totals[0].session_count, 2);
    assert_eq!(totals[1].subject, "Physics");
    assert_eq!(totals[1].total_minutes, 20);

    assert_eq!(store.total_study_minutes(user.user_id, None).await.unwrap(), 95);
}

#[tokio::test]
async fn list_orders_by_date_then_creation() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let first = store
        .insert_study_session(user.user_id, &session("Math", 30, day(2024, 1, 2)))
        .await
        .unwrap();
    let second = store
        .insert_study_session(user.user_id, &session("Physics", 20, day(2024, 1, 2)))
        .await
        .unwrap();
    let older = store
        .insert_study_session(user.user_id, &session("Math", 45, day(2024, 1, 1)))
        .await
        .unwrap();

    let all = store
        .list_study_sessions(user.user_id, &SessionFilter::default())
        .await
        .unwrap();
    let ids: Vec<i64> = all.iter().map(|s| s.session_id).collect();
    // Date descending; within a date the most recently created comes first.
    assert_eq!(ids, vec![second.session_id, first.session_id, older.session_id]);

    let math_only = store
        .list_study_sessions(
            user.user_id,
            &SessionFilter {
                subject: Some("Math".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(math_only.len(), 2);
    assert!(math_only.iter().all(|s| s.subject == "Math"));

    let ranged = store
        .list_study_sessions(
            user.user_id,
            &SessionFilter {
                from: Some(day(2024, 1, 2)),
                to: Some(day(2024, 1, 2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 2);

    let limited = store
        .list_study_sessions(
            user.user_id,
            &SessionFilter {
                limit: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].session_id, second.session_id);
}

#[tokio::test]
async fn daily_totals_cover_every_day_in_range() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    store
        .insert_study_session(user.user_id, &session("Math", 45, day(2024, 1, 1)))
        .await
        .unwrap();
    store
        .insert_study_session(user.user_id, &session("Math", 15, day(2024, 1, 1)))
        .await
        .unwrap();
    store
        .insert_study_session(user.user_id, &session("Physics", 30, day(2024, 1, 3)))
        .await
        .unwrap();

    let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 7)).unwrap();
    let totals = store.daily_totals(user.user_id, range).await.unwrap();

    assert_eq!(totals.len(), 7);
    assert_eq!(totals[0].date, day(2024, 1, 1));
    assert_eq!(totals[0].total_minutes, 60);
    assert_eq!(totals[1].total_minutes, 0);
    assert_eq!(totals[2].total_minutes, 30);
    assert!(totals[3..].iter().all(|t| t.total_minutes == 0));
}

#[tokio::test]
async fn delete_requires_ownership() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();

    let logged = store
        .insert_study_session(alice.user_id, &session("Math", 45, day(2024, 1, 1)))
        .await
        .unwrap();

    // Bob cannot delete Alice's session.
    assert!(matches!(
        store.delete_study_session(bob.user_id, logged.session_id).await,
        Err(PortError::NotFound(_))
    ));

    store
        .delete_study_session(alice.user_id, logged.session_id)
        .await
        .unwrap();
    assert!(matches!(
        store.delete_study_session(alice.user_id, logged.session_id).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn mood_and_productivity_distributions_count_sessions() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    for (mood, productivity) in [("good", "high"), ("good", "medium"), ("poor", "high")] {
        let entry =
            NewStudySession::new("Math", 25, mood, productivity, None, day(2024, 1, 1)).unwrap();
        store.insert_study_session(user.user_id, &entry).await.unwrap();
    }

    let moods = store.mood_counts(user.user_id).await.unwrap();
    assert_eq!(moods[0].1, 2); // good
    assert_eq!(moods.iter().map(|(_, c)| c).sum::<i64>(), 3);

    let productivity = store.productivity_counts(user.user_id).await.unwrap();
    assert_eq!(productivity[0].1, 2); // high
}

//=========================================================================================
// Weekly goals
//=========================================================================================

#[tokio::test]
async fn goal_upsert_is_idempotent() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let week = day(2024, 1, 1);

    let first = store.upsert_goal(user.user_id, "Math", 300, week).await.unwrap();
    let second = store.upsert_goal(user.user_id, "Math", 240, week).await.unwrap();

    // One row, latest target, same identity.
    assert_eq!(first.goal_id, second.goal_id);
    let goals = store.list_goals(user.user_id).await.unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].weekly_target_minutes, 240);

    // A different week is a different goal.
    store.upsert_goal(user.user_id, "Math", 300, day(2024, 1, 8)).await.unwrap();
    assert_eq!(store.list_goals(user.user_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn goal_validation_rejects_bad_targets() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    assert!(matches!(
        store.upsert_goal(user.user_id, "Math", 0, day(2024, 1, 1)).await,
        Err(PortError::Validation(_))
    ));
    assert!(matches!(
        store.upsert_goal(user.user_id, "  ", 100, day(2024, 1, 1)).await,
        Err(PortError::Validation(_))
    ));
}

#[tokio::test]
async fn goal_progress_sums_the_week_for_the_subject() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let week = day(2024, 1, 1);

    store.upsert_goal(user.user_id, "Math", 300, week).await.unwrap();
    store
        .insert_study_session(user.user_id, &session("Math", 45, day(2024, 1, 1)))
        .await
        .unwrap();
    store
        .insert_study_session(user.user_id, &session("Math", 30, day(2024, 1, 2)))
        .await
        .unwrap();
    // Outside the 7-day window.
    store
        .insert_study_session(user.user_id, &session("Math", 60, day(2024, 1, 8)))
        .await
        .unwrap();
    // Different subject, inside the window.
    store
        .insert_study_session(user.user_id, &session("Physics", 90, day(2024, 1, 2)))
        .await
        .unwrap();

    let progress = store.goal_progress(user.user_id, "Math", week).await.unwrap();
    assert_eq!(progress.achieved_minutes, 75);
    assert_eq!(progress.target_minutes, 300);
    assert_eq!(progress.percentage(), 25.0);

    assert!(matches!(
        store.goal_progress(user.user_id, "Chemistry", week).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn weekly_progress_reports_every_goal_of_the_week() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let week = day(2024, 1, 1);

    store.upsert_goal(user.user_id, "Math", 300, week).await.unwrap();
    store.upsert_goal(user.user_id, "Physics", 120, week).await.unwrap();
    store
        .insert_study_session(user.user_id, &session("Physics", 150, day(2024, 1, 3)))
        .await
        .unwrap();

    let progress = store.weekly_progress(user.user_id, week).await.unwrap();
    assert_eq!(progress.len(), 2);

    let math = progress.iter().find(|p| p.subject == "Math").unwrap();
    assert_eq!(math.achieved_minutes, 0);

    let physics = progress.iter().find(|p| p.subject == "Physics").unwrap();
    assert_eq!(physics.achieved_minutes, 150);
    assert!(physics.percentage() > 100.0);
}

//=========================================================================================
// Pomodoro lifecycle
//=========================================================================================

#[tokio::test]
async fn only_one_active_pomodoro_per_user() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let running = store.start_pomodoro(user.user_id, "Physics", 25).await.unwrap();
    assert_eq!(running.status, PomodoroStatus::Active);
    assert_eq!(running.completed_at, None);

    assert!(matches!(
        store.start_pomodoro(user.user_id, "Math", 25).await,
        Err(PortError::Conflict(_))
    ));

    // A different user is unaffected.
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();
    store.start_pomodoro(bob.user_id, "Math", 25).await.unwrap();

    // Completing frees the slot.
    store.complete_pomodoro(user.user_id, running.session_id).await.unwrap();
    store.start_pomodoro(user.user_id, "Math", 25).await.unwrap();
}

#[tokio::test]
async fn terminal_pomodoro_states_are_final() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let running = store.start_pomodoro(user.user_id, "Physics", 25).await.unwrap();
    let done = store.complete_pomodoro(user.user_id, running.session_id).await.unwrap();
    assert_eq!(done.status, PomodoroStatus::Completed);
    assert!(done.completed_at.is_some());

    assert!(matches!(
        store.complete_pomodoro(user.user_id, running.session_id).await,
        Err(PortError::InvalidTransition(_))
    ));
    assert!(matches!(
        store.cancel_pomodoro(user.user_id, running.session_id).await,
        Err(PortError::InvalidTransition(_))
    ));

    let second = store.start_pomodoro(user.user_id, "Math", 25).await.unwrap();
    let cancelled = store.cancel_pomodoro(user.user_id, second.session_id).await.unwrap();
    assert_eq!(cancelled.status, PomodoroStatus::Cancelled);
    assert!(matches!(
        store.complete_pomodoro(user.user_id, second.session_id).await,
        Err(PortError::InvalidTransition(_))
    ));

    assert!(matches!(
        store.complete_pomodoro(user.user_id, 9999).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn current_pomodoro_tracks_the_active_session() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    assert!(store.active_pomodoro(user.user_id).await.unwrap().is_none());

    let running = store.start_pomodoro(user.user_id, "Physics", 25).await.unwrap();
    let current = store.active_pomodoro(user.user_id).await.unwrap().unwrap();
    assert_eq!(current.session_id, running.session_id);

    store.cancel_pomodoro(user.user_id, running.session_id).await.unwrap();
    assert!(store.active_pomodoro(user.user_id).await.unwrap().is_none());
}

#[tokio::test]
async fn pomodoro_stats_count_completed_sessions_only() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let a = store.start_pomodoro(user.user_id, "Physics", 25).await.unwrap();
    store.complete_pomodoro(user.user_id, a.session_id).await.unwrap();
    let b = store.start_pomodoro(user.user_id, "Physics", 50).await.unwrap();
    store.complete_pomodoro(user.user_id, b.session_id).await.unwrap();
    let c = store.start_pomodoro(user.user_id, "Math", 25).await.unwrap();
    store.cancel_pomodoro(user.user_id, c.session_id).await.unwrap();

    let stats = store.pomodoro_stats(user.user_id).await.unwrap();
    assert_eq!(stats.completed_sessions, 2);
    assert_eq!(stats.completed_minutes, 75);
    assert_eq!(stats.today_sessions, 2);
    assert_eq!(stats.subjects.len(), 1);
    assert_eq!(stats.subjects[0].subject, "Physics");
    assert_eq!(stats.subjects[0].total_minutes, 75);
}

#[tokio::test]
async fn pomodoro_start_validates_input() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    assert!(matches!(
        store.start_pomodoro(user.user_id, "", 25).await,
        Err(PortError::Validation(_))
    ));
    assert!(matches!(
        store.start_pomodoro(user.user_id, "Math", 0).await,
        Err(PortError::Validation(_))
    ));
}

#[tokio::test]
async fn recent_pomodoros_lists_completed_newest_first() {
    let store = adapter().await;
    let user = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();

    let a = store.start_pomodoro(user.user_id, "Physics", 25).await.unwrap();
    store.complete_pomodoro(user.user_id, a.session_id).await.unwrap();
    let b = store.start_pomodoro(user.user_id, "Math", 50).await.unwrap();
    store.complete_pomodoro(user.user_id, b.session_id).await.unwrap();
    let c = store.start_pomodoro(user.user_id, "History", 25).await.unwrap();
    store.cancel_pomodoro(user.user_id, c.session_id).await.unwrap();

    // Cancelled sessions are not part of the history.
    let recent = store.recent_pomodoros(user.user_id, 10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].session_id, b.session_id);
    assert_eq!(recent[1].session_id, a.session_id);
    assert!(recent.iter().all(|s| s.status == PomodoroStatus::Completed));

    let capped = store.recent_pomodoros(user.user_id, 1).await.unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped[0].session_id, b.session_id);

    assert!(matches!(
        store.recent_pomodoros(user.user_id, 0).await,
        Err(PortError::Validation(_))
    ));
}

//=========================================================================================
// Friendships
//=========================================================================================

#[tokio::test]
async fn friend_request_flows_from_pending_to_accepted() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();

    let request = store.send_friend_request(alice.user_id, "bob").await.unwrap();
    assert_eq!(request.requester_id, alice.user_id);
    assert_eq!(request.addressee_id, bob.user_id);
    assert_eq!(request.status, FriendshipStatus::Pending);
    assert!(request.responded_at.is_none());

    // Only the addressee sees it as pending.
    let inbox = store.pending_friend_requests(bob.user_id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].friendship_id, request.friendship_id);
    assert_eq!(inbox[0].username, "alice");
    assert!(store.pending_friend_requests(alice.user_id).await.unwrap().is_empty());

    let accepted = store
        .respond_to_friend_request(bob.user_id, request.friendship_id, true)
        .await
        .unwrap();
    assert_eq!(accepted.status, FriendshipStatus::Accepted);
    assert!(accepted.responded_at.is_some());

    // Both sides now list the other as a friend.
    let alices = store.list_friends(alice.user_id).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].user_id, bob.user_id);
    assert_eq!(alices[0].username, "bob");
    let bobs = store.list_friends(bob.user_id).await.unwrap();
    assert_eq!(bobs.len(), 1);
    assert_eq!(bobs[0].username, "alice");
    assert!(store.pending_friend_requests(bob.user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn friend_request_guards_reject_bad_targets() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();

    assert!(matches!(
        store.send_friend_request(alice.user_id, "nobody").await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        store.send_friend_request(alice.user_id, "alice").await,
        Err(PortError::Validation(_))
    ));

    let request = store.send_friend_request(alice.user_id, "bob").await.unwrap();

    // A second request in either direction conflicts while one is pending.
    assert!(matches!(
        store.send_friend_request(alice.user_id, "bob").await,
        Err(PortError::Conflict(_))
    ));
    assert!(matches!(
        store.send_friend_request(bob.user_id, "alice").await,
        Err(PortError::Conflict(_))
    ));

    store
        .respond_to_friend_request(bob.user_id, request.friendship_id, true)
        .await
        .unwrap();
    assert!(matches!(
        store.send_friend_request(alice.user_id, "bob").await,
        Err(PortError::Conflict(_))
    ));
}

#[tokio::test]
async fn only_the_addressee_answers_a_pending_request() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();
    let carol = store.create_user("carol", "c@x.com", "pw-hash").await.unwrap();

    let request = store.send_friend_request(alice.user_id, "bob").await.unwrap();

    // Neither the requester nor a stranger may answer it.
    assert!(matches!(
        store.respond_to_friend_request(alice.user_id, request.friendship_id, true).await,
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        store.respond_to_friend_request(carol.user_id, request.friendship_id, true).await,
        Err(PortError::NotFound(_))
    ));

    store
        .respond_to_friend_request(bob.user_id, request.friendship_id, false)
        .await
        .unwrap();

    // A rejected request is no longer answerable.
    assert!(matches!(
        store.respond_to_friend_request(bob.user_id, request.friendship_id, true).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn rejected_pairs_may_ask_again() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();

    let first = store.send_friend_request(alice.user_id, "bob").await.unwrap();
    store
        .respond_to_friend_request(bob.user_id, first.friendship_id, false)
        .await
        .unwrap();

    // Bob changes his mind and asks Alice instead.
    let second = store.send_friend_request(bob.user_id, "alice").await.unwrap();
    assert_eq!(second.friendship_id, first.friendship_id);
    assert_eq!(second.requester_id, bob.user_id);
    assert_eq!(second.addressee_id, alice.user_id);
    assert_eq!(second.status, FriendshipStatus::Pending);
    assert!(second.responded_at.is_none());

    let inbox = store.pending_friend_requests(alice.user_id).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].username, "bob");
}

#[tokio::test]
async fn removing_a_friend_works_from_either_side_once() {
    let store = adapter().await;
    let alice = store.create_user("alice", "a@x.com", "pw-hash").await.unwrap();
    let bob = store.create_user("bob", "b@x.com", "pw-hash").await.unwrap();

    let request = store.send_friend_request(alice.user_id, "bob").await.unwrap();

    // Not friends yet.
    assert!(matches!(
        store.remove_friend(alice.user_id, bob.user_id).await,
        Err(PortError::NotFound(_))
    ));

    store
        .respond_to_friend_request(bob.user_id, request.friendship_id, true)
        .await
        .unwrap();

    // The addressee may dissolve a friendship the requester created.
    store.remove_friend(bob.user_id, alice.user_id).await.unwrap();
    assert!(store.list_friends(alice.user_id).await.unwrap().is_empty());
    assert!(store.list_friends(bob.user_id).await.unwrap().is_empty());

    assert!(matches!(
        store.remove_friend(alice.user_id, bob.user_id).await,
        Err(PortError::NotFound(_))
    ));
}
