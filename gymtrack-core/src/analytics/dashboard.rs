//! Dashboard adapters.
//!
//! Each dashboard view is a thin composition of the shared primitives:
//! resolve the viewer's scope into a [`LogFilter`], narrow the logs, and
//! select the fields the view shows. None of them aggregate on their own.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use super::aggregate::{
    aggregate_by_member, aggregate_by_workout_type, busiest_weekday, participation,
    period_totals, timeline, weekday_distribution, workout_type_matrix, Granularity, MatrixRow,
    MemberSummary, Participation, PeriodTotals, TimelinePoint, WorkoutTypeSummary,
};
use super::consistency::{
    score_all_members, score_member_consistency, ConsistencyScore, MemberConsistency,
};
use super::filter::{eligible_members, LogFilter, MemberScope, MemberSelection, Viewer};
use super::period::{CalendarPeriod, DateWindow, TimeRange};
use super::progress::ProgramProgress;
use super::streak::{streak_from_dates, StreakRecord};
use super::trend::{compare_periods, workout_type_trends, PeriodComparison, WorkoutTypeTrend};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Member, Snapshot};

/// Everything a dashboard request carries besides the data itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub time_range: TimeRange,
    pub selection: MemberSelection,
    pub viewer: Viewer,
    pub today: NaiveDate,
}

impl DashboardQuery {
    /// An admin looking at everyone.
    pub fn admin(time_range: TimeRange, today: NaiveDate) -> Self {
        Self {
            time_range,
            selection: MemberSelection::All,
            viewer: Viewer::admin(),
            today,
        }
    }

    pub fn window(&self) -> DateWindow {
        self.time_range.current_window(self.today)
    }

    pub fn period(&self) -> CalendarPeriod {
        CalendarPeriod::containing(self.time_range, self.today)
    }

    fn filter(&self) -> LogFilter {
        LogFilter::for_viewer(&self.viewer, &self.selection)
    }

    fn visible_members(&self, snapshot: &Snapshot, scope: &MemberScope) -> Vec<Member> {
        snapshot
            .members
            .iter()
            .filter(|m| scope.includes(&m.member_name))
            .cloned()
            .collect()
    }
}

/// Overview dashboard: headline numbers for the selected period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewDashboard {
    pub period: String,
    pub window: DateWindow,
    pub totals: PeriodTotals,
    pub participation: Participation,
    pub comparison: PeriodComparison,
    pub top_members: Vec<MemberSummary>,
    pub workout_types: Vec<WorkoutTypeSummary>,
    pub timeline: Vec<TimelinePoint>,
    /// Monday first
    pub weekday_distribution: [u32; 7],
    pub busiest_day: Option<Weekday>,
    pub program_window: DateWindow,
    pub program: ProgramProgress,
}

pub fn build_overview(
    snapshot: &Snapshot,
    query: &DashboardQuery,
    config: &Config,
) -> Result<OverviewDashboard> {
    let window = query.window();
    let scope_filter = query.filter();
    let logs = scope_filter.clone().within(window).apply(&snapshot.logs);
    let members = query.visible_members(snapshot, &scope_filter.scope);

    let eligible = eligible_members(&snapshot.members, &scope_filter.scope, &window);
    let mut top_members = aggregate_by_member(&logs, &members, query.today);
    top_members.retain(|s| s.workout_count > 0);
    top_members.truncate(config.dashboard.top_members);

    let distribution = weekday_distribution(&logs);
    let schedule = config.program.schedule()?;

    tracing::debug!(
        range = %query.time_range,
        logs = logs.len(),
        eligible = eligible.len(),
        "Built overview dashboard"
    );

    Ok(OverviewDashboard {
        period: query.period().display_name(),
        window,
        totals: period_totals(&logs),
        participation: participation(&logs, &eligible),
        comparison: compare_periods(snapshot, &scope_filter, query.time_range, query.today),
        top_members,
        workout_types: aggregate_by_workout_type(&logs, &snapshot.workouts),
        timeline: timeline(&logs, &window, Granularity::for_range(query.time_range)),
        weekday_distribution: distribution,
        busiest_day: busiest_weekday(&distribution),
        program_window: schedule.window(),
        program: schedule.progress(query.today),
    })
}

/// One member's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDashboard {
    pub member_name: String,
    pub period: String,
    /// Activity within the selected period
    pub summary: MemberSummary,
    /// Streaks over the member's whole history
    pub streak: StreakRecord,
    /// Consistency within the selected period, relative to the whole gym
    pub consistency: ConsistencyScore,
    pub workout_mix: Vec<WorkoutTypeSummary>,
    pub timeline: Vec<TimelinePoint>,
    pub comparison: PeriodComparison,
}

/// Dashboard for `member_name`.
///
/// Non-admins may only open their own dashboard.
pub fn build_member_dashboard(
    snapshot: &Snapshot,
    query: &DashboardQuery,
    member_name: &str,
    config: &Config,
) -> Result<MemberDashboard> {
    if !query.viewer.can_see(member_name) {
        tracing::warn!(member = member_name, "Member dashboard denied");
        return Err(Error::Forbidden(member_name.to_string()));
    }
    let member = snapshot
        .member(member_name)
        .ok_or_else(|| Error::UnknownMember(member_name.to_string()))?;

    let window = query.window();
    let member_filter = LogFilter::for_viewer(
        &query.viewer,
        &MemberSelection::Member(member_name.to_string()),
    );
    let history = snapshot.logs_for(member_name);
    let logs = member_filter.clone().within(window).apply(&snapshot.logs);
    // Peers for relative scores: the whole gym within the window
    let peers = LogFilter::default().within(window).apply(&snapshot.logs);

    let summary = aggregate_by_member(&logs, std::slice::from_ref(member), query.today)
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut workout_mix = aggregate_by_workout_type(&logs, &[]);
    workout_mix.retain(|w| w.workout_count > 0);

    tracing::debug!(
        member = member_name,
        logs = logs.len(),
        history = history.len(),
        "Built member dashboard"
    );

    Ok(MemberDashboard {
        member_name: member.member_name.clone(),
        period: query.period().display_name(),
        summary,
        streak: streak_from_dates(history.iter().map(|l| l.date), query.today),
        consistency: score_member_consistency(&logs, &peers, &config.scoring),
        workout_mix,
        timeline: timeline(&logs, &window, Granularity::for_range(query.time_range)),
        comparison: compare_periods(snapshot, &member_filter, query.time_range, query.today),
    })
}

/// Trends dashboard: how this period compares with the last one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsDashboard {
    pub period: String,
    pub comparison: PeriodComparison,
    pub workout_type_trends: Vec<WorkoutTypeTrend>,
    pub timeline: Vec<TimelinePoint>,
    pub matrix: Vec<MatrixRow>,
}

pub fn build_trends(snapshot: &Snapshot, query: &DashboardQuery) -> TrendsDashboard {
    let window = query.window();
    let scope_filter = query.filter();
    let scoped = scope_filter.apply(&snapshot.logs);
    let logs = scope_filter.clone().within(window).apply(&snapshot.logs);
    let members = query.visible_members(snapshot, &scope_filter.scope);

    tracing::debug!(
        range = %query.time_range,
        logs = logs.len(),
        "Built trends dashboard"
    );

    TrendsDashboard {
        period: query.period().display_name(),
        comparison: compare_periods(snapshot, &scope_filter, query.time_range, query.today),
        workout_type_trends: workout_type_trends(
            &scoped,
            &snapshot.workouts,
            query.time_range,
            query.today,
        ),
        timeline: timeline(&logs, &window, Granularity::for_range(query.time_range)),
        matrix: workout_type_matrix(&logs, &members, &snapshot.workouts),
    }
}

/// Consistency leaderboard for the selected period.
///
/// Admins see every member; others see only their own row. Scores are
/// always relative to the whole gym.
pub fn build_leaderboard(
    snapshot: &Snapshot,
    query: &DashboardQuery,
    config: &Config,
) -> Vec<MemberConsistency> {
    let window = query.window();
    let scope = query.filter().scope;
    let logs = LogFilter::default().within(window).apply(&snapshot.logs);

    let mut scores = score_all_members(&logs, &snapshot.members, &config.scoring);
    scores.retain(|entry| scope.includes(&entry.member_name));

    tracing::debug!(members = scores.len(), "Built leaderboard");
    scores
}
