//! Composite 0-10 consistency score.
//!
//! Five sub-scores, each clamped to `[0, 10]` and rounded to one decimal:
//!
//! | Sub-score | Measures |
//! |-----------|----------|
//! | frequency | workout count relative to the most active member |
//! | regularity | mean gap between workout days vs. the ideal gap |
//! | variety | distinct workout types relative to the most varied member |
//! | completion | how steady session lengths are (mean absolute deviation) |
//! | streak | longest streak in days, capped at 10 |
//!
//! The overall score is their unweighted mean.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use super::streak::longest_streak;
use super::{ratio, round1};
use crate::config::ScoringConfig;
use crate::types::{Member, WorkoutLog};

const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyScore {
    pub frequency_score: f64,
    pub regularity_score: f64,
    pub variety_score: f64,
    pub completion_score: f64,
    pub streak_score: f64,
    pub overall_score: f64,
}

/// A member's consistency score, for leaderboards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberConsistency {
    pub member_name: String,
    pub score: ConsistencyScore,
}

fn clamp_score(raw: f64) -> f64 {
    round1(raw.clamp(0.0, MAX_SCORE))
}

/// Best workout count and best distinct-type count over all members.
fn population_maxima(all_logs: &[WorkoutLog]) -> (u32, usize) {
    let mut per_member: BTreeMap<&str, (u32, BTreeSet<&str>)> = BTreeMap::new();
    for log in all_logs {
        let entry = per_member.entry(log.member_name.as_str()).or_default();
        entry.0 += 1;
        entry.1.insert(log.workout_name.as_str());
    }
    per_member
        .values()
        .fold((0, 0), |(count, types), (c, t)| (count.max(*c), types.max(t.len())))
}

fn regularity(dates: &BTreeSet<NaiveDate>, scoring: &ScoringConfig) -> f64 {
    if dates.len() < 2 {
        return 0.0;
    }
    let gaps: Vec<f64> = dates
        .iter()
        .zip(dates.iter().skip(1))
        .map(|(a, b)| (*b - *a).num_days() as f64)
        .collect();
    let avg_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
    let deviation = (avg_gap - scoring.ideal_gap_days).abs();
    clamp_score((1.0 - ratio(deviation, scoring.gap_tolerance_days)) * MAX_SCORE)
}

fn completion(durations: &[f64]) -> f64 {
    if durations.is_empty() {
        return 0.0;
    }
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;
    if mean <= 0.0 {
        return 0.0;
    }
    let mad = durations.iter().map(|d| (d - mean).abs()).sum::<f64>() / durations.len() as f64;
    clamp_score((1.0 - mad / mean) * MAX_SCORE)
}

/// Score one member against everyone in `all_logs`.
///
/// A member without logs scores zero on everything.
pub fn score_member_consistency(
    member_logs: &[WorkoutLog],
    all_logs: &[WorkoutLog],
    scoring: &ScoringConfig,
) -> ConsistencyScore {
    if member_logs.is_empty() {
        return ConsistencyScore::default();
    }

    let count = member_logs.len() as u32;
    let dates: BTreeSet<NaiveDate> = member_logs.iter().map(|l| l.date).collect();
    let types: BTreeSet<&str> = member_logs.iter().map(|l| l.workout_name.as_str()).collect();
    let durations: Vec<f64> = member_logs.iter().map(|l| f64::from(l.duration)).collect();

    let (max_count, max_types) = population_maxima(all_logs);
    let max_count = max_count.max(count);
    let max_types = max_types.max(types.len());

    let frequency_score = clamp_score(ratio(f64::from(count), f64::from(max_count)) * MAX_SCORE);
    let regularity_score = regularity(&dates, scoring);
    let variety_score = clamp_score(ratio(types.len() as f64, max_types as f64) * MAX_SCORE);
    let completion_score = completion(&durations);
    let streak_score = clamp_score(f64::from(longest_streak(dates.iter().copied())));

    let overall_score = round1(
        (frequency_score + regularity_score + variety_score + completion_score + streak_score)
            / 5.0,
    );

    ConsistencyScore {
        frequency_score,
        regularity_score,
        variety_score,
        completion_score,
        streak_score,
        overall_score,
    }
}

/// Scores for every listed member plus any member seen only in `logs`.
///
/// Sorted by overall score (descending), then name.
pub fn score_all_members(
    logs: &[WorkoutLog],
    members: &[Member],
    scoring: &ScoringConfig,
) -> Vec<MemberConsistency> {
    let mut by_member: BTreeMap<&str, Vec<WorkoutLog>> = members
        .iter()
        .map(|m| (m.member_name.as_str(), Vec::new()))
        .collect();
    for log in logs {
        by_member
            .entry(log.member_name.as_str())
            .or_default()
            .push(log.clone());
    }

    let mut scores: Vec<MemberConsistency> = by_member
        .into_iter()
        .map(|(name, member_logs)| MemberConsistency {
            member_name: name.to_string(),
            score: score_member_consistency(&member_logs, logs, scoring),
        })
        .collect();

    scores.sort_by(|a, b| {
        b.score
            .overall_score
            .total_cmp(&a.score.overall_score)
            .then_with(|| a.member_name.cmp(&b.member_name))
    });
    scores
}
