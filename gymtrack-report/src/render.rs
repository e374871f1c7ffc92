//! Text renderers for the dashboard views.
//!
//! Each view has a terminal layout and a markdown layout. JSON export goes
//! straight through serde on [`Report`].

use std::fmt::{self, Write};

use gymtrack_core::analytics::{
    weekday_name, MemberConsistency, MemberDashboard, OverviewDashboard, PeriodComparison,
    TimelinePoint, TrendMetric, TrendsDashboard,
};
use gymtrack_core::format::{format_minutes, format_score, plural};
use serde::Serialize;

const WIDTH: usize = 60;
const BAR_WIDTH: u32 = 30;

/// One rendered dashboard view.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum Report {
    Overview(OverviewDashboard),
    Member(MemberDashboard),
    Trends(TrendsDashboard),
    Leaderboard {
        period: String,
        entries: Vec<MemberConsistency>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Terminal,
    Markdown,
}

pub fn render(report: &Report, style: Style) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match (report, style) {
        (Report::Overview(d), Style::Terminal) => overview_terminal(&mut out, d)?,
        (Report::Overview(d), Style::Markdown) => overview_markdown(&mut out, d)?,
        (Report::Member(d), Style::Terminal) => member_terminal(&mut out, d)?,
        (Report::Member(d), Style::Markdown) => member_markdown(&mut out, d)?,
        (Report::Trends(d), Style::Terminal) => trends_terminal(&mut out, d)?,
        (Report::Trends(d), Style::Markdown) => trends_markdown(&mut out, d)?,
        (Report::Leaderboard { period, entries }, Style::Terminal) => {
            leaderboard_terminal(&mut out, period, entries)?
        }
        (Report::Leaderboard { period, entries }, Style::Markdown) => {
            leaderboard_markdown(&mut out, period, entries)?
        }
    }
    Ok(out)
}

// ============================================
// Terminal
// ============================================

fn header(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "╭{}╮", "─".repeat(WIDTH))?;
    writeln!(out, "│{:^width$}│", title, width = WIDTH)?;
    writeln!(out, "╰{}╯", "─".repeat(WIDTH))?;
    writeln!(out)
}

fn overview_terminal(out: &mut String, d: &OverviewDashboard) -> fmt::Result {
    header(out, &format!("Gym Overview: {}", d.period))?;

    if d.totals.workout_count == 0 {
        writeln!(out, "  No activity found for this period.")?;
        writeln!(out)?;
        return program_terminal(out, d);
    }

    writeln!(out, "SUMMARY")?;
    writeln!(
        out,
        "   Workouts: {:<12} Total Time: {}",
        d.totals.workout_count,
        format_minutes(d.totals.total_duration)
    )?;
    writeln!(
        out,
        "   Average:  {:<12} Active Days: {}",
        format_minutes(u64::from(d.totals.average_duration)),
        d.totals.active_days
    )?;
    writeln!(
        out,
        "   Members:  {:<12} Participation: {:.1}%",
        format!(
            "{}/{}",
            d.participation.active_members, d.participation.eligible_members
        ),
        d.participation.rate
    )?;
    writeln!(out)?;

    comparison_terminal(out, &d.comparison)?;

    if !d.top_members.is_empty() {
        writeln!(out, "TOP MEMBERS")?;
        for (i, member) in d.top_members.iter().enumerate() {
            writeln!(
                out,
                "   {}. {:<16} {:>4} workouts  {:>8}  streak {}",
                i + 1,
                member.member_name,
                member.workout_count,
                format_minutes(member.total_duration),
                plural(member.current_streak, "day")
            )?;
        }
        writeln!(out)?;
    }

    if !d.workout_types.is_empty() {
        writeln!(out, "WORKOUT TYPES")?;
        for summary in &d.workout_types {
            writeln!(
                out,
                "   {:<16} {:>4} workouts  avg {:>6}  {}",
                summary.workout_name,
                summary.workout_count,
                format_minutes(u64::from(summary.average_duration)),
                plural(summary.participants_count, "member")
            )?;
        }
        writeln!(out)?;
    }

    if let Some(day) = d.busiest_day {
        writeln!(out, "TIME PATTERNS")?;
        writeln!(out, "   Busiest day:  {}", weekday_name(day))?;
        writeln!(out)?;
    }

    timeline_terminal(out, &d.timeline)?;
    program_terminal(out, d)
}

fn program_terminal(out: &mut String, d: &OverviewDashboard) -> fmt::Result {
    let p = &d.program;
    writeln!(
        out,
        "PROGRAM  {} - {}",
        d.program_window.start.format("%Y-%m-%d"),
        d.program_window.end.format("%Y-%m-%d")
    )?;
    if p.elapsed_program_days < 1 {
        let wait = u64::try_from(1 - p.elapsed_program_days).unwrap_or(0);
        writeln!(out, "   Starts in {}", plural(wait, "day"))?;
    } else if p.is_complete() {
        writeln!(out, "   Complete ({} total)", plural(p.total_program_days, "day"))?;
    } else {
        writeln!(
            out,
            "   Day {} of {} ({:.1}%), {} left",
            p.elapsed_program_days,
            p.total_program_days,
            p.progress_percentage,
            plural(p.remaining_program_days, "day")
        )?;
    }
    writeln!(out)
}

fn comparison_terminal(out: &mut String, c: &PeriodComparison) -> fmt::Result {
    if c.previous_window.is_none() {
        return Ok(());
    }
    writeln!(out, "VS PREVIOUS PERIOD")?;
    metric_line(out, "Workouts", &c.workout_count, |v| format!("{v:.0}"))?;
    metric_line(out, "Total time", &c.total_duration, |v| {
        format_minutes(v as u64)
    })?;
    metric_line(out, "Avg session", &c.average_duration, |v| {
        format_minutes(v as u64)
    })?;
    metric_line(out, "Members", &c.active_members, |v| format!("{v:.0}"))?;
    metric_line(out, "Participation", &c.participation_rate, |v| {
        format!("{v:.1}%")
    })?;
    writeln!(out)
}

fn metric_line(
    out: &mut String,
    label: &str,
    metric: &TrendMetric,
    show: impl Fn(f64) -> String,
) -> fmt::Result {
    writeln!(
        out,
        "   {:<14} {:>8} (was {:>8})  {}",
        label,
        show(metric.current_value),
        show(metric.previous_value),
        metric.format_delta()
    )
}

fn timeline_terminal(out: &mut String, points: &[TimelinePoint]) -> fmt::Result {
    let peak = points.iter().map(|p| p.workout_count).max().unwrap_or(0);
    if peak == 0 {
        return Ok(());
    }
    writeln!(out, "ACTIVITY")?;
    for point in points {
        let filled = ((point.workout_count * BAR_WIDTH + peak - 1) / peak) as usize;
        writeln!(
            out,
            "   {:<12} {:<bar$} {}",
            point.label,
            "█".repeat(filled),
            point.workout_count,
            bar = BAR_WIDTH as usize
        )?;
    }
    writeln!(out)
}

fn member_terminal(out: &mut String, d: &MemberDashboard) -> fmt::Result {
    header(out, &format!("{}: {}", d.member_name, d.period))?;

    let s = &d.summary;
    if s.workout_count == 0 {
        writeln!(out, "  No activity found for this period.")?;
        writeln!(out)?;
    } else {
        writeln!(out, "SUMMARY")?;
        writeln!(
            out,
            "   Workouts: {:<12} Total Time: {}",
            s.workout_count,
            format_minutes(s.total_duration)
        )?;
        writeln!(
            out,
            "   Average:  {:<12} Active Days: {}",
            format_minutes(u64::from(s.average_duration)),
            s.active_days
        )?;
        writeln!(out, "   Workout types: {}", s.unique_workout_types)?;
        writeln!(out)?;
    }

    writeln!(out, "STREAKS")?;
    if d.streak.is_alive() {
        writeln!(out, "   Current:  {}", plural(d.streak.current_streak, "day"))?;
    } else {
        writeln!(out, "   Current:  none")?;
    }
    write!(out, "   Longest:  {}", plural(d.streak.longest_streak, "day"))?;
    if let (Some(start), Some(end)) = (d.streak.longest_streak_start, d.streak.longest_streak_end)
    {
        write!(out, " ({} - {})", start.format("%b %d"), end.format("%b %d"))?;
    }
    writeln!(out)?;
    if let Some(last) = d.streak.last_active {
        writeln!(out, "   Last workout: {}", last.format("%Y-%m-%d"))?;
    }
    writeln!(out)?;

    let c = &d.consistency;
    writeln!(out, "CONSISTENCY  {}", format_score(c.overall_score))?;
    writeln!(out, "   Frequency:   {}", format_score(c.frequency_score))?;
    writeln!(out, "   Regularity:  {}", format_score(c.regularity_score))?;
    writeln!(out, "   Variety:     {}", format_score(c.variety_score))?;
    writeln!(out, "   Completion:  {}", format_score(c.completion_score))?;
    writeln!(out, "   Streak:      {}", format_score(c.streak_score))?;
    writeln!(out)?;

    if !d.workout_mix.is_empty() {
        writeln!(out, "WORKOUT MIX")?;
        for summary in &d.workout_mix {
            writeln!(
                out,
                "   {:<16} {:>4} workouts  {:>8}",
                summary.workout_name,
                summary.workout_count,
                format_minutes(summary.total_duration)
            )?;
        }
        writeln!(out)?;
    }

    comparison_terminal(out, &d.comparison)?;
    timeline_terminal(out, &d.timeline)
}

fn trends_terminal(out: &mut String, d: &TrendsDashboard) -> fmt::Result {
    header(out, &format!("Trends: {}", d.period))?;

    comparison_terminal(out, &d.comparison)?;

    if !d.workout_type_trends.is_empty() {
        writeln!(out, "WORKOUT TYPES")?;
        for entry in &d.workout_type_trends {
            writeln!(
                out,
                "   {:<16} {:>4} (was {:>4})  {}",
                entry.workout_name,
                entry.trend.current_value,
                entry.trend.previous_value,
                entry.trend.format_delta()
            )?;
        }
        writeln!(out)?;
    }

    timeline_terminal(out, &d.timeline)?;

    if !d.matrix.is_empty() {
        writeln!(out, "MEMBER x WORKOUT")?;
        for row in &d.matrix {
            let cells: Vec<String> = row
                .counts
                .iter()
                .map(|c| format!("{} {}", c.workout_name, c.count))
                .collect();
            writeln!(
                out,
                "   {:<16} {:>4}  {}",
                row.member_name,
                row.total,
                cells.join(", ")
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn leaderboard_terminal(
    out: &mut String,
    period: &str,
    entries: &[MemberConsistency],
) -> fmt::Result {
    header(out, &format!("Consistency Leaderboard: {}", period))?;

    if entries.is_empty() {
        writeln!(out, "  No members to rank.")?;
        return writeln!(out);
    }

    writeln!(
        out,
        "   {:<4} {:<16} {:>8} {:>6} {:>6} {:>6} {:>6} {:>6}",
        "#", "Member", "Overall", "Freq", "Reg", "Var", "Comp", "Strk"
    )?;
    for (i, entry) in entries.iter().enumerate() {
        let s = &entry.score;
        writeln!(
            out,
            "   {:<4} {:<16} {:>8.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1} {:>6.1}",
            format!("{}.", i + 1),
            entry.member_name,
            s.overall_score,
            s.frequency_score,
            s.regularity_score,
            s.variety_score,
            s.completion_score,
            s.streak_score
        )?;
    }
    writeln!(out)
}

// ============================================
// Markdown
// ============================================

fn overview_markdown(out: &mut String, d: &OverviewDashboard) -> fmt::Result {
    writeln!(out, "# Gym Overview: {}", d.period)?;
    writeln!(out)?;

    if d.totals.workout_count == 0 {
        writeln!(out, "*No activity found for this period.*")?;
        writeln!(out)?;
        return program_markdown(out, d);
    }

    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Value |")?;
    writeln!(out, "|--------|-------|")?;
    writeln!(out, "| Workouts | {} |", d.totals.workout_count)?;
    writeln!(out, "| Total Time | {} |", format_minutes(d.totals.total_duration))?;
    writeln!(
        out,
        "| Average Session | {} |",
        format_minutes(u64::from(d.totals.average_duration))
    )?;
    writeln!(out, "| Active Days | {} |", d.totals.active_days)?;
    writeln!(
        out,
        "| Active Members | {} of {} |",
        d.participation.active_members, d.participation.eligible_members
    )?;
    writeln!(out, "| Participation | {:.1}% |", d.participation.rate)?;
    writeln!(out)?;

    comparison_markdown(out, &d.comparison)?;

    if !d.top_members.is_empty() {
        writeln!(out, "## Top Members")?;
        writeln!(out)?;
        for (i, member) in d.top_members.iter().enumerate() {
            writeln!(
                out,
                "{}. **{}** - {}, {}",
                i + 1,
                member.member_name,
                plural(member.workout_count, "workout"),
                format_minutes(member.total_duration)
            )?;
        }
        writeln!(out)?;
    }

    if !d.workout_types.is_empty() {
        writeln!(out, "## Workout Types")?;
        writeln!(out)?;
        writeln!(out, "| Workout | Count | Avg Duration | Members |")?;
        writeln!(out, "|---------|-------|--------------|---------|")?;
        for summary in &d.workout_types {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                summary.workout_name,
                summary.workout_count,
                format_minutes(u64::from(summary.average_duration)),
                summary.participants_count
            )?;
        }
        writeln!(out)?;
    }

    if let Some(day) = d.busiest_day {
        writeln!(out, "**Busiest day:** {}", weekday_name(day))?;
        writeln!(out)?;
    }

    program_markdown(out, d)
}

fn program_markdown(out: &mut String, d: &OverviewDashboard) -> fmt::Result {
    let p = &d.program;
    writeln!(out, "## Program")?;
    writeln!(out)?;
    writeln!(
        out,
        "**{}** to **{}**",
        d.program_window.start.format("%Y-%m-%d"),
        d.program_window.end.format("%Y-%m-%d")
    )?;
    writeln!(out)?;
    if p.elapsed_program_days < 1 {
        let wait = u64::try_from(1 - p.elapsed_program_days).unwrap_or(0);
        writeln!(out, "Starts in {}.", plural(wait, "day"))?;
    } else {
        writeln!(
            out,
            "Day {} of {} ({:.1}%), {} remaining.",
            p.elapsed_program_days,
            p.total_program_days,
            p.progress_percentage,
            plural(p.remaining_program_days, "day")
        )?;
    }
    writeln!(out)
}

fn comparison_markdown(out: &mut String, c: &PeriodComparison) -> fmt::Result {
    if c.previous_window.is_none() {
        return Ok(());
    }
    writeln!(out, "## vs Previous Period")?;
    writeln!(out)?;
    writeln!(out, "| Metric | Current | Previous | Change |")?;
    writeln!(out, "|--------|---------|----------|--------|")?;
    let rows = [
        ("Workouts", &c.workout_count),
        ("Total Minutes", &c.total_duration),
        ("Avg Minutes", &c.average_duration),
        ("Active Members", &c.active_members),
        ("Participation %", &c.participation_rate),
    ];
    for (label, metric) in rows {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            label,
            metric.current_value,
            metric.previous_value,
            metric.format_delta()
        )?;
    }
    writeln!(out)
}

fn member_markdown(out: &mut String, d: &MemberDashboard) -> fmt::Result {
    writeln!(out, "# {}: {}", d.member_name, d.period)?;
    writeln!(out)?;

    let s = &d.summary;
    if s.workout_count == 0 {
        writeln!(out, "*No activity found for this period.*")?;
    } else {
        writeln!(out, "## Summary")?;
        writeln!(out)?;
        writeln!(out, "| Metric | Value |")?;
        writeln!(out, "|--------|-------|")?;
        writeln!(out, "| Workouts | {} |", s.workout_count)?;
        writeln!(out, "| Total Time | {} |", format_minutes(s.total_duration))?;
        writeln!(
            out,
            "| Average Session | {} |",
            format_minutes(u64::from(s.average_duration))
        )?;
        writeln!(out, "| Active Days | {} |", s.active_days)?;
        writeln!(out, "| Workout Types | {} |", s.unique_workout_types)?;
    }
    writeln!(out)?;

    writeln!(out, "## Streaks")?;
    writeln!(out)?;
    if d.streak.is_alive() {
        writeln!(out, "- **Current:** {}", plural(d.streak.current_streak, "day"))?;
    } else {
        writeln!(out, "- **Current:** none")?;
    }
    writeln!(out, "- **Longest:** {}", plural(d.streak.longest_streak, "day"))?;
    writeln!(out)?;

    let c = &d.consistency;
    writeln!(out, "## Consistency: {}", format_score(c.overall_score))?;
    writeln!(out)?;
    writeln!(out, "| Component | Score |")?;
    writeln!(out, "|-----------|-------|")?;
    writeln!(out, "| Frequency | {:.1} |", c.frequency_score)?;
    writeln!(out, "| Regularity | {:.1} |", c.regularity_score)?;
    writeln!(out, "| Variety | {:.1} |", c.variety_score)?;
    writeln!(out, "| Completion | {:.1} |", c.completion_score)?;
    writeln!(out, "| Streak | {:.1} |", c.streak_score)?;
    writeln!(out)?;

    if !d.workout_mix.is_empty() {
        writeln!(out, "## Workout Mix")?;
        writeln!(out)?;
        for summary in &d.workout_mix {
            writeln!(
                out,
                "- **{}** - {}, {}",
                summary.workout_name,
                plural(summary.workout_count, "workout"),
                format_minutes(summary.total_duration)
            )?;
        }
        writeln!(out)?;
    }

    comparison_markdown(out, &d.comparison)
}

fn trends_markdown(out: &mut String, d: &TrendsDashboard) -> fmt::Result {
    writeln!(out, "# Trends: {}", d.period)?;
    writeln!(out)?;

    comparison_markdown(out, &d.comparison)?;

    if !d.workout_type_trends.is_empty() {
        writeln!(out, "## Workout Types")?;
        writeln!(out)?;
        writeln!(out, "| Workout | Current | Previous | Change |")?;
        writeln!(out, "|---------|---------|----------|--------|")?;
        for entry in &d.workout_type_trends {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                entry.workout_name,
                entry.trend.current_value,
                entry.trend.previous_value,
                entry.trend.format_delta()
            )?;
        }
        writeln!(out)?;
    }

    if d.timeline.iter().any(|p| p.workout_count > 0) {
        writeln!(out, "## Activity")?;
        writeln!(out)?;
        writeln!(out, "| Period | Workouts | Members | Avg Duration |")?;
        writeln!(out, "|--------|----------|---------|--------------|")?;
        for point in &d.timeline {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                point.label,
                point.workout_count,
                point.unique_members,
                format_minutes(u64::from(point.avg_duration))
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn leaderboard_markdown(
    out: &mut String,
    period: &str,
    entries: &[MemberConsistency],
) -> fmt::Result {
    writeln!(out, "# Consistency Leaderboard: {}", period)?;
    writeln!(out)?;

    if entries.is_empty() {
        writeln!(out, "*No members to rank.*")?;
        return Ok(());
    }

    writeln!(
        out,
        "| # | Member | Overall | Frequency | Regularity | Variety | Completion | Streak |"
    )?;
    writeln!(
        out,
        "|---|--------|---------|-----------|------------|---------|------------|--------|"
    )?;
    for (i, entry) in entries.iter().enumerate() {
        let s = &entry.score;
        writeln!(
            out,
            "| {} | {} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} | {:.1} |",
            i + 1,
            entry.member_name,
            s.overall_score,
            s.frequency_score,
            s.regularity_score,
            s.variety_score,
            s.completion_score,
            s.streak_score
        )?;
    }
    Ok(())
}
