//! Consecutive-day streaks.
//!
//! A streak is a maximal run of calendar-consecutive distinct workout dates.
//! Several workouts on one day count as a single day.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::period::days_between;
use crate::types::{Member, WorkoutLog};

/// Streak statistics for one member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakRecord {
    /// Length of the run ending today or yesterday, else 0
    pub current_streak: u32,
    /// Longest run of consecutive days
    pub longest_streak: u32,
    /// First day of the longest run (earliest one on ties)
    pub longest_streak_start: Option<NaiveDate>,
    /// Last day of the longest run
    pub longest_streak_end: Option<NaiveDate>,
    /// Most recent workout date
    pub last_active: Option<NaiveDate>,
}

impl StreakRecord {
    /// Whether the member worked out today or yesterday.
    pub fn is_alive(&self) -> bool {
        self.current_streak > 0
    }
}

/// Compute streaks from a set of workout dates, relative to `today`.
///
/// The current streak is the run that ends at the latest date not after
/// `today`, and only counts if that date is today or yesterday.
pub fn streak_from_dates<I>(dates: I, today: NaiveDate) -> StreakRecord
where
    I: IntoIterator<Item = NaiveDate>,
{
    let dates: BTreeSet<NaiveDate> = dates.into_iter().collect();

    let mut record = StreakRecord {
        last_active: dates.iter().next_back().copied(),
        ..Default::default()
    };

    let mut run = 0u32;
    let mut run_start: Option<NaiveDate> = None;
    let mut prev: Option<NaiveDate> = None;
    // Run length as of the latest date <= today
    let mut run_at_today: Option<(NaiveDate, u32)> = None;

    for &date in &dates {
        match prev {
            Some(p) if days_between(p, date) == 1 => run += 1,
            _ => {
                run = 1;
                run_start = Some(date);
            }
        }
        if run > record.longest_streak {
            record.longest_streak = run;
            record.longest_streak_start = run_start;
            record.longest_streak_end = Some(date);
        }
        if date <= today {
            run_at_today = Some((date, run));
        }
        prev = Some(date);
    }

    if let Some((last, length)) = run_at_today {
        if days_between(last, today) <= 1 {
            record.current_streak = length;
        }
    }

    record
}

/// Longest run of consecutive days, independent of today.
pub fn longest_streak<I>(dates: I) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    streak_from_dates(dates, NaiveDate::MIN).longest_streak
}

/// Streaks for every member.
///
/// Listed members without logs get a zero record; members that only appear
/// in the logs are included as well.
pub fn compute_streaks(
    logs: &[WorkoutLog],
    members: &[Member],
    today: NaiveDate,
) -> BTreeMap<String, StreakRecord> {
    let mut dates_by_member: BTreeMap<String, BTreeSet<NaiveDate>> = members
        .iter()
        .map(|m| (m.member_name.clone(), BTreeSet::new()))
        .collect();

    for log in logs {
        dates_by_member
            .entry(log.member_name.clone())
            .or_default()
            .insert(log.date);
    }

    dates_by_member
        .into_iter()
        .map(|(name, dates)| (name, streak_from_dates(dates, today)))
        .collect()
}
