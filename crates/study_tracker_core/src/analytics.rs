//! crates/study_tracker_core/src/analytics.rs
//!
//! Pure aggregation helpers shared by the store adapter and the analytics
//! endpoints. Everything here is derived on demand from rows the store
//! returns; no independent state.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use crate::domain::{DailyTotal, DateRange};

/// Expands sparse per-day sums into one entry per calendar day in `range`,
/// with zero minutes for days that have no sessions.
pub fn fill_daily_totals(range: DateRange, sparse: &[DailyTotal]) -> Vec<DailyTotal> {
    let by_date: HashMap<NaiveDate, i64> = sparse
        .iter()
        .map(|t| (t.date, t.total_minutes))
        .collect();
    range
        .days()
        .map(|date| DailyTotal {
            date,
            total_minutes: by_date.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// Consecutive-day study streaks over a set of distinct study dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streaks {
    /// Length of the run ending today or yesterday (a day without logging
    /// yet does not break a streak until it is over).
    pub current: i64,
    /// Longest run anywhere in the history.
    pub longest: i64,
}

/// Computes streaks from `dates`, which must be sorted ascending and
/// contain no duplicates (the store query guarantees both).
pub fn compute_streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    if dates.is_empty() {
        return Streaks { current: 0, longest: 0 };
    }

    let mut longest = 1i64;
    let mut run = 1i64;
    for pair in dates.windows(2) {
        if pair[1] - pair[0] == Duration::days(1) {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    let last = *dates.last().unwrap();
    let current = if today - last <= Duration::days(1) { run } else { 0 };

    Streaks { current, longest }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fill_covers_every_day_in_range() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 5)).unwrap();
        let sparse = vec![
            DailyTotal { date: day(2024, 1, 2), total_minutes: 30 },
            DailyTotal { date: day(2024, 1, 4), total_minutes: 45 },
        ];
        let filled = fill_daily_totals(range, &sparse);
        assert_eq!(filled.len(), 5);
        assert_eq!(filled[0], DailyTotal { date: day(2024, 1, 1), total_minutes: 0 });
        assert_eq!(filled[1].total_minutes, 30);
        assert_eq!(filled[2].total_minutes, 0);
        assert_eq!(filled[3].total_minutes, 45);
        assert_eq!(filled[4].total_minutes, 0);
    }

    #[test]
    fn fill_of_empty_history_is_all_zeroes() {
        let range = DateRange::new(day(2024, 1, 1), day(2024, 1, 3)).unwrap();
        let filled = fill_daily_totals(range, &[]);
        assert_eq!(filled.len(), 3);
        assert!(filled.iter().all(|t| t.total_minutes == 0));
    }

    #[test]
    fn streaks_of_empty_history_are_zero() {
        assert_eq!(
            compute_streaks(&[], day(2024, 1, 10)),
            Streaks { current: 0, longest: 0 }
        );
    }

    #[test]
    fn streak_ending_yesterday_still_counts() {
        let dates = [day(2024, 1, 7), day(2024, 1, 8), day(2024, 1, 9)];
        let streaks = compute_streaks(&dates, day(2024, 1, 10));
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.longest, 3);
    }

    #[test]
    fn stale_streak_resets_current_but_not_longest() {
        let dates = [
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 4),
            day(2024, 1, 20),
        ];
        let streaks = compute_streaks(&dates, day(2024, 1, 25));
        assert_eq!(streaks.current, 0);
        assert_eq!(streaks.longest, 4);
    }

    #[test]
    fn current_streak_picks_up_the_trailing_run() {
        let dates = [
            day(2024, 1, 1),
            day(2024, 1, 2),
            day(2024, 1, 3),
            day(2024, 1, 9),
            day(2024, 1, 10),
        ];
        let streaks = compute_streaks(&dates, day(2024, 1, 10));
        assert_eq!(streaks.current, 2);
        assert_eq!(streaks.longest, 3);
    }
}
