//! Per-member and per-workout-type aggregation.
//!
//! Aggregators do no filtering of their own: callers hand in logs already
//! narrowed by a [`LogFilter`](super::filter::LogFilter). Each aggregator is
//! a single fold into a map of accumulators keyed by name.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use super::period::{DateWindow, TimeRange};
use super::streak::streak_from_dates;
use super::{ratio, round1};
use crate::types::{Member, WorkoutLog, WorkoutType};

/// Per-member workout statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub member_name: String,
    pub workout_count: u32,
    /// Minutes
    pub total_duration: u64,
    /// Minutes, rounded
    pub average_duration: u32,
    /// Distinct dates with at least one workout
    pub active_days: u32,
    pub unique_workout_types: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
}

/// Per-workout-type statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeSummary {
    pub workout_name: String,
    pub workout_count: u32,
    pub total_duration: u64,
    pub average_duration: u32,
    /// Distinct members who did this workout
    pub participants_count: u32,
}

/// Totals over a set of logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub workout_count: u32,
    pub total_duration: u64,
    pub average_duration: u32,
    pub active_members: u32,
    pub active_days: u32,
}

/// Share of eligible members with at least one workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub active_members: u32,
    pub eligible_members: u32,
    /// Percentage, one decimal
    pub rate: f64,
}

/// Rounded mean duration in minutes, 0 when there are no workouts.
pub fn average_minutes(total: u64, count: u32) -> u32 {
    ratio(total as f64, f64::from(count)).round() as u32
}

#[derive(Default)]
struct Accumulator<'a> {
    workout_count: u32,
    total_duration: u64,
    dates: BTreeSet<NaiveDate>,
    /// Workout names for members, member names for workout types
    related: BTreeSet<&'a str>,
}

impl<'a> Accumulator<'a> {
    fn add(&mut self, log: &WorkoutLog, related: &'a str) {
        self.workout_count += 1;
        self.total_duration += u64::from(log.duration);
        self.dates.insert(log.date);
        self.related.insert(related);
    }

    fn average_duration(&self) -> u32 {
        average_minutes(self.total_duration, self.workout_count)
    }
}

/// Summaries for every listed member plus any member seen only in `logs`.
///
/// Sorted by workout count (descending), then name.
pub fn aggregate_by_member(
    logs: &[WorkoutLog],
    members: &[Member],
    today: NaiveDate,
) -> Vec<MemberSummary> {
    let mut accumulators: BTreeMap<&str, Accumulator> = members
        .iter()
        .map(|m| (m.member_name.as_str(), Accumulator::default()))
        .collect();

    for log in logs {
        accumulators
            .entry(log.member_name.as_str())
            .or_default()
            .add(log, &log.workout_name);
    }

    let mut summaries: Vec<MemberSummary> = accumulators
        .into_iter()
        .map(|(name, acc)| {
            let streak = streak_from_dates(acc.dates.iter().copied(), today);
            MemberSummary {
                member_name: name.to_string(),
                workout_count: acc.workout_count,
                total_duration: acc.total_duration,
                average_duration: acc.average_duration(),
                active_days: acc.dates.len() as u32,
                unique_workout_types: acc.related.len() as u32,
                longest_streak: streak.longest_streak,
                current_streak: streak.current_streak,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.workout_count
            .cmp(&a.workout_count)
            .then_with(|| a.member_name.cmp(&b.member_name))
    });
    summaries
}

/// Summaries for every listed workout type plus any type seen only in `logs`.
///
/// Sorted by workout count (descending), then name.
pub fn aggregate_by_workout_type(
    logs: &[WorkoutLog],
    workout_types: &[WorkoutType],
) -> Vec<WorkoutTypeSummary> {
    let mut accumulators: BTreeMap<&str, Accumulator> = workout_types
        .iter()
        .map(|w| (w.workout_name.as_str(), Accumulator::default()))
        .collect();

    for log in logs {
        accumulators
            .entry(log.workout_name.as_str())
            .or_default()
            .add(log, &log.member_name);
    }

    let mut summaries: Vec<WorkoutTypeSummary> = accumulators
        .into_iter()
        .map(|(name, acc)| WorkoutTypeSummary {
            workout_name: name.to_string(),
            workout_count: acc.workout_count,
            total_duration: acc.total_duration,
            average_duration: acc.average_duration(),
            participants_count: acc.related.len() as u32,
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.workout_count
            .cmp(&a.workout_count)
            .then_with(|| a.workout_name.cmp(&b.workout_name))
    });
    summaries
}

pub fn period_totals(logs: &[WorkoutLog]) -> PeriodTotals {
    let mut acc = Accumulator::default();
    for log in logs {
        acc.add(log, &log.member_name);
    }
    PeriodTotals {
        workout_count: acc.workout_count,
        total_duration: acc.total_duration,
        average_duration: acc.average_duration(),
        active_members: acc.related.len() as u32,
        active_days: acc.dates.len() as u32,
    }
}

/// Participation of `eligible` members in `logs`.
pub fn participation(logs: &[WorkoutLog], eligible: &[&Member]) -> Participation {
    let logged: BTreeSet<&str> = logs.iter().map(|l| l.member_name.as_str()).collect();
    let active = eligible
        .iter()
        .filter(|m| logged.contains(m.member_name.as_str()))
        .count() as u32;
    let eligible_count = eligible.len() as u32;

    Participation {
        active_members: active,
        eligible_members: eligible_count,
        rate: round1(ratio(f64::from(active), f64::from(eligible_count)) * 100.0),
    }
}

// ============================================
// Timeline
// ============================================

/// Bucket size for timeline charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    /// ISO weeks, starting Monday
    Week,
    Month,
}

impl Granularity {
    /// Month views chart days, quarter views weeks, year views months.
    pub fn for_range(range: TimeRange) -> Self {
        match range {
            TimeRange::Month => Granularity::Day,
            TimeRange::Quarter => Granularity::Week,
            TimeRange::Year => Granularity::Month,
        }
    }

    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date - Duration::days(i64::from(date.day0())),
        }
    }

    pub fn label(&self, bucket: NaiveDate) -> String {
        match self {
            Granularity::Day => bucket.format("%b %d").to_string(),
            Granularity::Week => bucket.format("Wk %b %d").to_string(),
            Granularity::Month => bucket.format("%b %Y").to_string(),
        }
    }
}

/// One point of an activity timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    /// First day of the bucket
    pub date: NaiveDate,
    pub label: String,
    pub workout_count: u32,
    pub unique_members: u32,
    pub avg_duration: u32,
}

/// Bucketed activity over `window`; every bucket is present, empty ones zeroed.
pub fn timeline(
    logs: &[WorkoutLog],
    window: &DateWindow,
    granularity: Granularity,
) -> Vec<TimelinePoint> {
    let mut buckets: BTreeMap<NaiveDate, Accumulator> = window
        .days()
        .map(|d| (granularity.bucket_start(d), Accumulator::default()))
        .collect();

    for log in logs.iter().filter(|l| window.contains(l.date)) {
        if let Some(acc) = buckets.get_mut(&granularity.bucket_start(log.date)) {
            acc.add(log, &log.member_name);
        }
    }

    buckets
        .into_iter()
        .map(|(date, acc)| TimelinePoint {
            date,
            label: granularity.label(date),
            workout_count: acc.workout_count,
            unique_members: acc.related.len() as u32,
            avg_duration: acc.average_duration(),
        })
        .collect()
}

// ============================================
// Weekday distribution
// ============================================

/// Workout count per weekday, Monday first.
pub fn weekday_distribution(logs: &[WorkoutLog]) -> [u32; 7] {
    let mut distribution = [0u32; 7];
    for log in logs {
        distribution[log.date.weekday().num_days_from_monday() as usize] += 1;
    }
    distribution
}

/// Weekday with the most workouts (earliest in the week on ties), `None` if empty.
pub fn busiest_weekday(distribution: &[u32; 7]) -> Option<Weekday> {
    let mut best: Option<(usize, u32)> = None;
    for (index, &count) in distribution.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, top)| count > top) {
            best = Some((index, count));
        }
    }
    best.and_then(|(index, _)| Weekday::try_from(index as u8).ok())
}

/// Full English weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ============================================
// Member x workout type matrix
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCount {
    pub workout_name: String,
    pub count: u32,
}

/// One member's row of the workout-type matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRow {
    pub member_name: String,
    /// One entry per listed workout type, in list order
    pub counts: Vec<WorkoutCount>,
    pub total: u32,
}

/// Workout counts per member and listed workout type.
///
/// Columns come from `workout_types` only; logs of unlisted types are not
/// counted. Rows cover the listed members, sorted by total then name.
pub fn workout_type_matrix(
    logs: &[WorkoutLog],
    members: &[Member],
    workout_types: &[WorkoutType],
) -> Vec<MatrixRow> {
    let mut cells: BTreeMap<(&str, &str), u32> = BTreeMap::new();
    for log in logs {
        *cells
            .entry((log.member_name.as_str(), log.workout_name.as_str()))
            .or_default() += 1;
    }

    let mut rows: Vec<MatrixRow> = members
        .iter()
        .map(|member| {
            let counts: Vec<WorkoutCount> = workout_types
                .iter()
                .map(|w| WorkoutCount {
                    workout_name: w.workout_name.clone(),
                    count: cells
                        .get(&(member.member_name.as_str(), w.workout_name.as_str()))
                        .copied()
                        .unwrap_or(0),
                })
                .collect();
            MatrixRow {
                member_name: member.member_name.clone(),
                total: counts.iter().map(|c| c.count).sum(),
                counts,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.member_name.cmp(&b.member_name))
    });
    rows
}
