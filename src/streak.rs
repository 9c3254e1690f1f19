//! Consecutive-day logging streaks.
//!
//! The walk runs over distinct day tokens, newest first. It only starts
//! counting when the newest day is today or yesterday; any larger gap means
//! the streak is already broken, however long the run before it was.

use crate::models::DayToken;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    NotAnchored,
    Counting { anchor: DayToken, streak: u32 },
    Terminated { streak: u32 },
}

impl WalkState {
    fn step(self, candidate: DayToken, today: DayToken) -> Self {
        match self {
            Self::NotAnchored => {
                let yesterday = today.previous();
                if candidate == today || Some(candidate) == yesterday {
                    Self::Counting {
                        anchor: candidate,
                        streak: 1,
                    }
                } else {
                    Self::Terminated { streak: 0 }
                }
            }
            Self::Counting { anchor, streak } => {
                if anchor.days_since(candidate) == 1 {
                    Self::Counting {
                        anchor: candidate,
                        streak: streak.saturating_add(1),
                    }
                } else {
                    Self::Terminated { streak }
                }
            }
            terminated @ Self::Terminated { .. } => terminated,
        }
    }

    fn streak(self) -> u32 {
        match self {
            Self::NotAnchored => 0,
            Self::Counting { streak, .. } | Self::Terminated { streak } => streak,
        }
    }
}

/// Deduplicates day tokens, newest first. The input is left untouched.
pub fn distinct_days<I>(days: I) -> Vec<DayToken>
where
    I: IntoIterator<Item = DayToken>,
{
    let unique: BTreeSet<DayToken> = days.into_iter().collect();
    unique.into_iter().rev().collect()
}

/// Length of the run of consecutive days ending at `today` or the day before.
pub fn current_streak<I>(days: I, today: DayToken) -> u32
where
    I: IntoIterator<Item = DayToken>,
{
    let mut state = WalkState::NotAnchored;
    for day in distinct_days(days) {
        // Future-dated entries are not part of any run ending today.
        if day > today {
            continue;
        }
        state = state.step(day, today);
        if matches!(state, WalkState::Terminated { .. }) {
            break;
        }
    }
    state.streak()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> DayToken {
        DayToken::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        let days = vec![day(2026, 1, 10), day(2026, 1, 11), day(2026, 1, 12)];
        assert_eq!(current_streak(days, day(2026, 1, 12)), 3);
    }

    #[test]
    fn gap_stops_the_walk() {
        let days = vec![day(2026, 1, 10), day(2026, 1, 12)];
        assert_eq!(current_streak(days, day(2026, 1, 12)), 1);
    }

    #[test]
    fn stale_last_day_yields_zero() {
        assert_eq!(current_streak(vec![day(2026, 1, 5)], day(2026, 1, 12)), 0);
    }

    #[test]
    fn yesterday_anchors_the_streak() {
        assert_eq!(current_streak(vec![day(2026, 1, 11)], day(2026, 1, 12)), 1);
    }

    #[test]
    fn long_run_ending_two_days_ago_is_broken() {
        let days: Vec<DayToken> = (1..=10).map(|d| day(2026, 1, d)).collect();
        assert_eq!(current_streak(days, day(2026, 1, 12)), 0);
    }

    #[test]
    fn duplicate_days_count_once() {
        let days = vec![
            day(2026, 1, 12),
            day(2026, 1, 12),
            day(2026, 1, 11),
            day(2026, 1, 11),
        ];
        assert_eq!(current_streak(days, day(2026, 1, 12)), 2);
    }

    #[test]
    fn empty_input_yields_zero() {
        assert_eq!(current_streak(Vec::new(), day(2026, 1, 12)), 0);
    }

    #[test]
    fn run_crosses_month_and_year_boundaries() {
        let days = vec![day(2025, 12, 30), day(2025, 12, 31), day(2026, 1, 1)];
        assert_eq!(current_streak(days, day(2026, 1, 1)), 3);
    }

    #[test]
    fn future_days_are_ignored() {
        let days = vec![day(2026, 1, 15), day(2026, 1, 12), day(2026, 1, 11)];
        assert_eq!(current_streak(days, day(2026, 1, 12)), 2);
    }

    #[test]
    fn distinct_days_sorts_descending() {
        let days = distinct_days(vec![day(2026, 1, 2), day(2026, 1, 3), day(2026, 1, 2)]);
        assert_eq!(days, vec![day(2026, 1, 3), day(2026, 1, 2)]);
    }
}
