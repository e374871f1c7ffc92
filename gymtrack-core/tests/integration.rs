//! Integration tests for the gymtrack analytics engine
//!
//! These tests go through the public API only: raw JSON in, validated
//! snapshot, then the aggregators, calculators and dashboard adapters.

use chrono::{Duration, NaiveDate};
use gymtrack_core::analytics::{
    aggregate_by_member, aggregate_by_workout_type, build_leaderboard, build_member_dashboard,
    build_overview, build_trends, compute_percent_change, compute_streaks, period_totals,
    score_all_members, timeline, DashboardQuery, Granularity, MemberSelection, ProgramSchedule,
    TimeRange, Viewer,
};
use gymtrack_core::config::ScoringConfig;
use gymtrack_core::{Config, Error, Member, RawSnapshot, Snapshot, WorkoutLog, WorkoutType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const SCENARIO: &str = r#"{
    "members": [
        {"member_name": "Ana", "gender": "F", "age": 31, "date_joined": "2024-11-02"},
        {"member_name": "Bob", "gender": "M", "age": 45, "date_joined": "2025-01-15"}
    ],
    "workouts": [{"workout_name": "Running"}, {"workout_name": "Yoga"}],
    "logs": [
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-01", "duration": 30},
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-02", "duration": 45},
        {"member_name": "Bob", "workout_name": "Yoga", "date": "2025-03-02", "duration": 60}
    ]
}"#;

fn scenario() -> Snapshot {
    let raw = RawSnapshot::from_json(SCENARIO).expect("scenario json should parse");
    Snapshot::try_from(raw).expect("scenario records should validate")
}

// ============================================
// End-to-end scenario
// ============================================

#[test]
fn test_end_to_end_member_aggregation() {
    let snapshot = scenario();
    let summaries = aggregate_by_member(&snapshot.logs, &snapshot.members, date(2025, 3, 10));

    assert_eq!(summaries.len(), 2);

    let ana = summaries.iter().find(|s| s.member_name == "Ana").unwrap();
    assert_eq!(ana.workout_count, 2);
    assert_eq!(ana.total_duration, 75);
    assert_eq!(ana.average_duration, 38);
    assert_eq!(ana.active_days, 2);
    assert_eq!(ana.unique_workout_types, 1);

    let bob = summaries.iter().find(|s| s.member_name == "Bob").unwrap();
    assert_eq!(bob.workout_count, 1);
    assert_eq!(bob.total_duration, 60);
    assert_eq!(bob.average_duration, 60);
    assert_eq!(bob.active_days, 1);
    assert_eq!(bob.unique_workout_types, 1);
}

#[test]
fn test_invalid_record_fails_fast() {
    let json = r#"{"logs": [
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-01", "duration": 30},
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-02"}
    ]}"#;
    let err = Snapshot::try_from(RawSnapshot::from_json(json).unwrap()).unwrap_err();
    match err {
        Error::Validation { record, field, .. } => {
            assert_eq!(record, "workout log #1");
            assert_eq!(field, "duration");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ============================================
// Zero-input safety and idempotence
// ============================================

#[test]
fn test_empty_inputs_yield_zeroed_results() {
    let today = date(2025, 3, 10);
    assert!(aggregate_by_member(&[], &[], today).is_empty());
    assert!(aggregate_by_workout_type(&[], &[]).is_empty());
    assert!(compute_streaks(&[], &[], today).is_empty());
    assert!(score_all_members(&[], &[], &ScoringConfig::default()).is_empty());
    assert_eq!(period_totals(&[]).average_duration, 0);

    let window = TimeRange::Month.current_window(today);
    let points = timeline(&[], &window, Granularity::Day);
    assert_eq!(points.len(), 10);
    assert!(points.iter().all(|p| p.avg_duration == 0));

    let query = DashboardQuery::admin(TimeRange::Quarter, today);
    let overview = build_overview(&Snapshot::default(), &query, &Config::default()).unwrap();
    assert_eq!(overview.totals.workout_count, 0);
    assert!(overview.comparison.total_duration.percent_change == 0);
}

#[test]
fn test_aggregation_is_idempotent() {
    let snapshot = scenario();
    let query = DashboardQuery::admin(TimeRange::Month, date(2025, 3, 10));
    let config = Config::default();

    let first = build_overview(&snapshot, &query, &config).unwrap();
    let second = build_overview(&snapshot, &query, &config).unwrap();
    assert_eq!(first, second);

    assert_eq!(build_trends(&snapshot, &query), build_trends(&snapshot, &query));
}

// ============================================
// Streaks and trends
// ============================================

#[test]
fn test_streak_properties() {
    let logs: Vec<WorkoutLog> = [1, 2, 3, 5]
        .into_iter()
        .map(|d| WorkoutLog::new("Ana", "Running", date(2025, 3, d), 30))
        .collect();
    let streaks = compute_streaks(&logs, &[Member::new("Ana")], date(2025, 3, 10));
    assert_eq!(streaks["Ana"].longest_streak, 3);
    assert_eq!(streaks["Ana"].current_streak, 0);

    let today = date(2025, 3, 10);
    let alive: Vec<WorkoutLog> = (1..=5)
        .map(|n| WorkoutLog::new("Bob", "Yoga", today - Duration::days(n), 40))
        .collect();
    let streaks = compute_streaks(&alive, &[], today);
    assert_eq!(streaks["Bob"].current_streak, 5);
}

#[test]
fn test_trend_saturation() {
    assert_eq!(compute_percent_change(5.0, 0.0), 100);
    assert_eq!(compute_percent_change(0.0, 0.0), 0);
    assert_eq!(compute_percent_change(8.0, 10.0), -20);
}

// ============================================
// Consistency and program progress
// ============================================

#[test]
fn test_consistency_scores_are_bounded() {
    let mut logs = Vec::new();
    for (i, member) in ["Ana", "Bob", "Cy", "Dee"].iter().enumerate() {
        for n in 0..(i as i64 * 3 + 1) {
            let workout = if n % 2 == 0 { "Running" } else { "Yoga" };
            logs.push(WorkoutLog::new(
                *member,
                workout,
                date(2025, 1, 1) + Duration::days(n * (i as i64 + 1)),
                (20 + n * 7) as u32,
            ));
        }
    }
    let members: Vec<Member> = ["Ana", "Bob", "Cy", "Dee", "Eve"]
        .iter()
        .map(|name| Member::new(*name))
        .collect();

    for entry in score_all_members(&logs, &members, &ScoringConfig::default()) {
        let s = entry.score;
        for value in [
            s.frequency_score,
            s.regularity_score,
            s.variety_score,
            s.completion_score,
            s.streak_score,
            s.overall_score,
        ] {
            assert!(
                (0.0..=10.0).contains(&value),
                "{} scored {value}",
                entry.member_name
            );
        }
    }
}

#[test]
fn test_program_progress_monotonic() {
    let schedule = ProgramSchedule::new(date(2025, 1, 1), date(2025, 3, 31)).unwrap();
    let mut last_elapsed = None;
    for offset in 0..150 {
        let progress = schedule.progress(date(2024, 12, 1) + Duration::days(offset));
        if let Some(previous) = last_elapsed {
            assert!(progress.elapsed_program_days > previous);
        }
        last_elapsed = Some(progress.elapsed_program_days);
        assert!((0.0..=100.0).contains(&progress.progress_percentage));
    }
}

// ============================================
// Viewer scoping
// ============================================

#[test]
fn test_member_viewer_only_sees_own_data() {
    let snapshot = scenario();
    let query = DashboardQuery {
        time_range: TimeRange::Month,
        selection: MemberSelection::All,
        viewer: Viewer::member("Ana"),
        today: date(2025, 3, 10),
    };
    let config = Config::default();

    let overview = build_overview(&snapshot, &query, &config).unwrap();
    assert_eq!(overview.totals.workout_count, 2);
    assert!(overview.top_members.iter().all(|m| m.member_name == "Ana"));

    assert!(build_member_dashboard(&snapshot, &query, "Ana", &config).is_ok());
    assert!(matches!(
        build_member_dashboard(&snapshot, &query, "Bob", &config),
        Err(Error::Forbidden(_))
    ));

    let board = build_leaderboard(&snapshot, &query, &config);
    assert_eq!(board.len(), 1);
}

#[test]
fn test_join_date_gates_participation() {
    let mut snapshot = scenario();
    snapshot
        .members
        .push(Member::new("Late").joined(date(2025, 4, 1)));
    snapshot.workouts.push(WorkoutType::new("Spin"));

    let query = DashboardQuery::admin(TimeRange::Month, date(2025, 3, 10));
    let overview = build_overview(&snapshot, &query, &Config::default()).unwrap();
    assert_eq!(overview.participation.eligible_members, 2);
    assert_eq!(overview.participation.rate, 100.0);
    assert_eq!(overview.workout_types.len(), 3);
}
