//! Period-over-period trends.
//!
//! Compares the current period-to-date window with the whole previous
//! calendar period (see [`TimeRange::previous_window`]).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::aggregate::{participation, period_totals};
use super::filter::{eligible_members, LogFilter};
use super::period::{DateWindow, TimeRange};
use crate::types::{Snapshot, WorkoutLog, WorkoutType};

/// Rounded percentage change from `previous` to `current`.
///
/// A zero baseline saturates: growth from nothing is reported as `100`
/// (new activity), and nothing-to-nothing as `0`.
pub fn compute_percent_change(current: f64, previous: f64) -> i64 {
    if previous > 0.0 {
        (((current - previous) / previous) * 100.0).round() as i64
    } else if current > 0.0 {
        100
    } else {
        0
    }
}

/// A value in the current window next to the same value in the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetric {
    pub current_value: f64,
    pub previous_value: f64,
    pub percent_change: i64,
}

impl TrendMetric {
    pub fn new(current_value: f64, previous_value: f64) -> Self {
        Self {
            current_value,
            previous_value,
            percent_change: compute_percent_change(current_value, previous_value),
        }
    }

    /// Format the change for display (e.g., "+23%" or "-15%").
    pub fn format_delta(&self) -> String {
        format_delta(self.percent_change)
    }
}

/// Format a percent change for display (e.g., "+23%" or "-15%").
pub fn format_delta(percent_change: i64) -> String {
    if percent_change >= 0 {
        format!("+{}%", percent_change)
    } else {
        format!("{}%", percent_change)
    }
}

/// Current-vs-previous comparison of the headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current_window: Option<DateWindow>,
    pub previous_window: Option<DateWindow>,
    pub workout_count: TrendMetric,
    pub total_duration: TrendMetric,
    pub average_duration: TrendMetric,
    pub active_members: TrendMetric,
    pub participation_rate: TrendMetric,
}

/// Compare the current window of `range` with the previous period.
///
/// `filter` supplies the member scope; its window is replaced by each of
/// the two comparison windows in turn.
pub fn compare_periods(
    snapshot: &Snapshot,
    filter: &LogFilter,
    range: TimeRange,
    today: NaiveDate,
) -> PeriodComparison {
    let current_window = range.current_window(today);
    let previous_window = range.previous_window(today);

    let current_logs = filter.clone().within(current_window).apply(&snapshot.logs);
    let previous_logs = filter.clone().within(previous_window).apply(&snapshot.logs);

    let current = period_totals(&current_logs);
    let previous = period_totals(&previous_logs);

    let current_eligible = eligible_members(&snapshot.members, &filter.scope, &current_window);
    let previous_eligible = eligible_members(&snapshot.members, &filter.scope, &previous_window);
    let current_rate = participation(&current_logs, &current_eligible).rate;
    let previous_rate = participation(&previous_logs, &previous_eligible).rate;

    PeriodComparison {
        current_window: Some(current_window),
        previous_window: Some(previous_window),
        workout_count: TrendMetric::new(
            f64::from(current.workout_count),
            f64::from(previous.workout_count),
        ),
        total_duration: TrendMetric::new(
            current.total_duration as f64,
            previous.total_duration as f64,
        ),
        average_duration: TrendMetric::new(
            f64::from(current.average_duration),
            f64::from(previous.average_duration),
        ),
        active_members: TrendMetric::new(
            f64::from(current.active_members),
            f64::from(previous.active_members),
        ),
        participation_rate: TrendMetric::new(current_rate, previous_rate),
    }
}

/// Workout count trend for one workout type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTypeTrend {
    pub workout_name: String,
    pub trend: TrendMetric,
}

/// Per-type workout count trends over the listed workout types.
///
/// Every listed type appears, even with no logs in either window; logs of
/// unlisted types are ignored. Sorted by current count, then name.
pub fn workout_type_trends(
    logs: &[WorkoutLog],
    workout_types: &[WorkoutType],
    range: TimeRange,
    today: NaiveDate,
) -> Vec<WorkoutTypeTrend> {
    let current_window = range.current_window(today);
    let previous_window = range.previous_window(today);

    let mut counts: BTreeMap<&str, (u32, u32)> = workout_types
        .iter()
        .map(|w| (w.workout_name.as_str(), (0, 0)))
        .collect();

    for log in logs {
        if let Some((current, previous)) = counts.get_mut(log.workout_name.as_str()) {
            if current_window.contains(log.date) {
                *current += 1;
            } else if previous_window.contains(log.date) {
                *previous += 1;
            }
        }
    }

    let mut trends: Vec<WorkoutTypeTrend> = counts
        .into_iter()
        .map(|(name, (current, previous))| WorkoutTypeTrend {
            workout_name: name.to_string(),
            trend: TrendMetric::new(f64::from(current), f64::from(previous)),
        })
        .collect();

    trends.sort_by(|a, b| {
        b.trend
            .current_value
            .total_cmp(&a.trend.current_value)
            .then_with(|| a.workout_name.cmp(&b.workout_name))
    });
    trends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::filter::{MemberSelection, Viewer};
    use crate::types::Member;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(compute_percent_change(5.0, 0.0), 100);
        assert_eq!(compute_percent_change(0.0, 0.0), 0);
        assert_eq!(compute_percent_change(8.0, 10.0), -20);
        assert_eq!(compute_percent_change(123.0, 100.0), 23);
        assert_eq!(compute_percent_change(0.0, 4.0), -100);
        assert_eq!(compute_percent_change(2.0, 3.0), -33);
    }

    #[test]
    fn test_format_delta() {
        assert_eq!(format_delta(23), "+23%");
        assert_eq!(format_delta(0), "+0%");
        assert_eq!(format_delta(-15), "-15%");
        assert_eq!(TrendMetric::new(8.0, 10.0).format_delta(), "-20%");
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Member::new("Ana"),
                Member::new("Bob"),
                Member::new("Cy").joined(date(2025, 3, 5)),
            ],
            vec![WorkoutType::new("Running"), WorkoutType::new("Yoga")],
            vec![
                WorkoutLog::new("Ana", "Running", date(2025, 2, 10), 30),
                WorkoutLog::new("Bob", "Running", date(2025, 2, 11), 30),
                WorkoutLog::new("Ana", "Running", date(2025, 3, 1), 40),
                WorkoutLog::new("Ana", "Yoga", date(2025, 3, 2), 50),
                WorkoutLog::new("Cy", "Yoga", date(2025, 3, 6), 60),
            ],
        )
    }

    #[test]
    fn test_compare_periods_month() {
        let filter = LogFilter::for_viewer(&Viewer::admin(), &MemberSelection::All);
        let comparison =
            compare_periods(&snapshot(), &filter, TimeRange::Month, date(2025, 3, 10));

        assert_eq!(
            comparison.previous_window,
            Some(DateWindow::new(date(2025, 2, 1), date(2025, 2, 28)))
        );
        assert_eq!(comparison.workout_count.current_value, 3.0);
        assert_eq!(comparison.workout_count.previous_value, 2.0);
        assert_eq!(comparison.workout_count.percent_change, 50);
        assert_eq!(comparison.total_duration.percent_change, 150);
        assert_eq!(comparison.active_members.percent_change, 0);
        // Cy had not joined by the end of February
        assert_eq!(comparison.participation_rate.previous_value, 100.0);
        assert_eq!(comparison.participation_rate.current_value, 66.7);
    }

    #[test]
    fn test_compare_periods_empty() {
        let comparison = compare_periods(
            &Snapshot::default(),
            &LogFilter::default(),
            TimeRange::Quarter,
            date(2025, 3, 10),
        );
        assert_eq!(comparison.workout_count, TrendMetric::default());
        assert_eq!(comparison.participation_rate.percent_change, 0);
    }

    #[test]
    fn test_workout_type_trends_include_idle_types() {
        let mut snapshot = snapshot();
        snapshot.workouts.push(WorkoutType::new("Spin"));
        snapshot
            .logs
            .push(WorkoutLog::new("Bob", "Boxing", date(2025, 3, 3), 45));

        let trends = workout_type_trends(
            &snapshot.logs,
            &snapshot.workouts,
            TimeRange::Month,
            date(2025, 3, 10),
        );
        let names: Vec<_> = trends.iter().map(|t| t.workout_name.as_str()).collect();
        assert_eq!(names, vec!["Yoga", "Running", "Spin"]);

        assert_eq!(trends[0].trend.percent_change, 100);
        assert_eq!(trends[1].trend.percent_change, -50);
        assert_eq!(trends[2].trend, TrendMetric::default());
    }
}
