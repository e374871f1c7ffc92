//! gymtrack-report - Gym dashboard reports
//!
//! Loads a snapshot of members, workout types and workout logs exported by
//! the gym's REST API and prints one dashboard view.

mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use gymtrack_core::analytics::{
    build_leaderboard, build_member_dashboard, build_overview, build_trends, today_utc,
    DashboardQuery, MemberSelection, TimeRange, Viewer,
};
use gymtrack_core::{parse_date, Config, RawSnapshot, Snapshot};

use render::{Report, Style};

#[derive(Parser, Debug)]
#[command(name = "gymtrack-report")]
#[command(about = "Gym membership analytics - dashboard reports")]
#[command(version)]
struct Args {
    /// JSON snapshot with "members", "workouts" and "logs" arrays
    #[arg(long)]
    data: PathBuf,

    /// Dashboard to render
    #[arg(long, value_enum, default_value_t = View::Overview)]
    view: View,

    /// Time range: month, quarter or year (default from config)
    #[arg(long)]
    range: Option<String>,

    /// Member to focus on, or "all"
    #[arg(long, default_value = "all")]
    member: String,

    /// View as this (non-admin) member instead of as an admin
    #[arg(long)]
    as_member: Option<String>,

    /// Reference date in YYYY-MM-DD (default: today, UTC)
    #[arg(long)]
    today: Option<String>,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum View {
    Overview,
    Member,
    Trends,
    Leaderboard,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = gymtrack_core::logging::init(&config.logging).ok();

    let time_range = match args.range.as_deref() {
        Some(range) => range.parse::<TimeRange>()?,
        None => config.dashboard.default_time_range,
    };
    let today = match args.today.as_deref() {
        Some(value) => parse_date(value)
            .with_context(|| format!("Invalid --today '{}'. Use YYYY-MM-DD", value))?,
        None => today_utc(),
    };
    let viewer = match &args.as_member {
        Some(name) => Viewer::member(name.clone()),
        None => Viewer::admin(),
    };
    let selection: MemberSelection = args.member.parse()?;

    let snapshot = load_snapshot(&args.data)?;
    let query = DashboardQuery {
        time_range,
        selection,
        viewer,
        today,
    };

    let report = match args.view {
        View::Overview => Report::Overview(
            build_overview(&snapshot, &query, &config).context("failed to build overview")?,
        ),
        View::Member => {
            let member_name = focused_member(&query)?;
            Report::Member(
                build_member_dashboard(&snapshot, &query, &member_name, &config)
                    .context("failed to build member dashboard")?,
            )
        }
        View::Trends => Report::Trends(build_trends(&snapshot, &query)),
        View::Leaderboard => Report::Leaderboard {
            period: query.period().display_name(),
            entries: build_leaderboard(&snapshot, &query, &config),
        },
    };

    match args.export.as_deref() {
        Some("json") => println!("{}", serde_json::to_string_pretty(&report)?),
        Some("md") => print!("{}", render::render(&report, Style::Markdown)?),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print!("{}", render::render(&report, Style::Terminal)?),
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let raw = RawSnapshot::from_json(&json)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Snapshot::try_from(raw).context("snapshot contains invalid records")
}

/// Member for the member view: the selection, or the viewer themself.
fn focused_member(query: &DashboardQuery) -> Result<String> {
    match (&query.selection, &query.viewer.member_name) {
        (MemberSelection::Member(name), _) => Ok(name.clone()),
        (MemberSelection::All, Some(own)) => Ok(own.clone()),
        (MemberSelection::All, None) => {
            anyhow::bail!("The member view needs --member <name> or --as-member <name>")
        }
    }
}
