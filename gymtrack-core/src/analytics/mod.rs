//! Analytics module for gymtrack
//!
//! Pure, stateless transformations from a [`Snapshot`](crate::Snapshot) of
//! workout logs into the derived metrics the dashboards show:
//! - Calendar periods and comparison windows ([`period`])
//! - Log filtering and viewer scoping ([`filter`])
//! - Per-member and per-workout-type aggregation, timelines ([`aggregate`])
//! - Consecutive-day streaks ([`streak`])
//! - Period-over-period trends ([`trend`])
//! - Composite consistency scores ([`consistency`])
//! - Training program progress ([`progress`])
//! - Dashboard adapters composing all of the above ([`dashboard`])
//!
//! Nothing here holds state between calls or performs I/O. Every function
//! is total over empty input: no logs yields zeroed results, never `NaN`.

pub mod aggregate;
pub mod consistency;
pub mod dashboard;
pub mod filter;
pub mod period;
pub mod progress;
pub mod streak;
pub mod trend;

pub use aggregate::{
    aggregate_by_member, aggregate_by_workout_type, average_minutes, busiest_weekday,
    participation, period_totals, timeline, weekday_distribution, weekday_name,
    workout_type_matrix, Granularity, MatrixRow, MemberSummary, Participation, PeriodTotals,
    TimelinePoint, WorkoutCount, WorkoutTypeSummary,
};
pub use consistency::{
    score_all_members, score_member_consistency, ConsistencyScore, MemberConsistency,
};
pub use dashboard::{
    build_leaderboard, build_member_dashboard, build_overview, build_trends, DashboardQuery,
    MemberDashboard, OverviewDashboard, TrendsDashboard,
};
pub use filter::{eligible_members, LogFilter, MemberScope, MemberSelection, Viewer};
pub use period::{days_between, today_utc, CalendarPeriod, DateWindow, TimeRange};
pub use progress::{ProgramProgress, ProgramSchedule};
pub use streak::{compute_streaks, longest_streak, streak_from_dates, StreakRecord};
pub use trend::{
    compare_periods, compute_percent_change, format_delta, workout_type_trends,
    PeriodComparison, TrendMetric, WorkoutTypeTrend,
};

/// `numerator / denominator`, or 0 when the denominator is 0.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
