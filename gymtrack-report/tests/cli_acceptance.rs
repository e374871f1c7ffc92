use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "members": [
        {"member_name": "Ana", "gender": "F", "age": 31, "date_joined": "2024-11-02"},
        {"member_name": "Bob", "gender": "M", "age": 45, "date_joined": "2025-01-15"}
    ],
    "workouts": [{"workout_name": "Running"}, {"workout_name": "Yoga"}],
    "logs": [
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-02-20", "duration": 40},
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-01", "duration": 30},
        {"member_name": "Ana", "workout_name": "Running", "date": "2025-03-02", "duration": 45},
        {"member_name": "Bob", "workout_name": "Yoga", "date": "2025-03-02", "duration": 60}
    ]
}"#;

struct CliTestEnv {
    _temp_dir: TempDir,
    home: PathBuf,
    xdg_config: PathBuf,
    xdg_state: PathBuf,
    data: PathBuf,
}

impl CliTestEnv {
    fn new() -> Self {
        Self::with_snapshot(SNAPSHOT)
    }

    fn with_snapshot(json: &str) -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let base = temp_dir.path().to_path_buf();
        let home = base.join("home");
        let xdg_config = base.join("xdg-config");
        let xdg_state = base.join("xdg-state");

        fs::create_dir_all(&home).expect("failed to create HOME");
        fs::create_dir_all(&xdg_config).expect("failed to create XDG_CONFIG_HOME");
        fs::create_dir_all(&xdg_state).expect("failed to create XDG_STATE_HOME");

        let data = base.join("snapshot.json");
        fs::write(&data, json).expect("failed to write snapshot");

        Self {
            _temp_dir: temp_dir,
            home,
            xdg_config,
            xdg_state,
            data,
        }
    }

    fn write_config(&self, toml: &str) {
        let dir = self.xdg_config.join("gymtrack");
        fs::create_dir_all(&dir).expect("failed to create config dir");
        fs::write(dir.join("config.toml"), toml).expect("failed to write config");
    }
}

fn run_report(env: &CliTestEnv, args: &[&str]) -> Output {
    let bin_path = PathBuf::from(assert_cmd::cargo::cargo_bin!("gymtrack-report"));

    Command::new(bin_path)
        .arg("--data")
        .arg(&env.data)
        .args(["--today", "2025-03-10"])
        .args(args)
        .env("HOME", &env.home)
        .env("XDG_CONFIG_HOME", &env.xdg_config)
        .env("XDG_STATE_HOME", &env.xdg_state)
        .output()
        .unwrap_or_else(|e| panic!("failed to execute gymtrack-report: {e}"))
}

fn assert_success(args: &[&str], output: &Output) {
    if output.status.success() {
        return;
    }

    let rendered_args = args
        .iter()
        .map(|arg| OsString::from(arg).to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    panic!(
        "gymtrack-report {rendered_args} failed\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
        output.status, stdout, stderr
    );
}

#[test]
fn overview_prints_terminal_dashboard() {
    let env = CliTestEnv::new();

    let output = run_report(&env, &[]);
    assert_success(&[], &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Gym Overview: March 2025"));
    assert!(stdout.contains("TOP MEMBERS"));
    assert!(
        stdout.contains("Workouts: 3"),
        "expected March totals in stdout, got:\n{stdout}"
    );
    assert!(stdout.contains("VS PREVIOUS PERIOD"));
}

#[test]
fn overview_exports_markdown_and_json() {
    let env = CliTestEnv::new();

    let args = ["--export", "md"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.starts_with("# Gym Overview: March 2025"));
    assert!(markdown.contains("| Workouts | 3 |"));

    let args = ["--export", "json"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("export should be valid json");
    assert_eq!(json["view"], "overview");
    assert_eq!(json["totals"]["workoutCount"], 3);
    assert_eq!(json["totals"]["totalDuration"], 135);
    assert_eq!(json["participation"]["eligibleMembers"], 2);
}

#[test]
fn quarter_range_widens_the_window() {
    let env = CliTestEnv::new();

    let args = ["--range", "quarter", "--export", "json"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("export should be valid json");
    assert_eq!(json["period"], "Q1 2025");
    assert_eq!(json["totals"]["workoutCount"], 4);
}

#[test]
fn member_view_shows_streaks_and_consistency() {
    let env = CliTestEnv::new();

    let args = ["--view", "member", "--member", "Ana"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Ana: March 2025"));
    assert!(stdout.contains("STREAKS"));
    assert!(stdout.contains("Longest:  2 days"));
    assert!(stdout.contains("CONSISTENCY"));
}

#[test]
fn member_viewer_defaults_to_own_dashboard() {
    let env = CliTestEnv::new();

    let args = ["--view", "member", "--as-member", "Bob", "--export", "json"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("export should be valid json");
    assert_eq!(json["view"], "member");
    assert_eq!(json["memberName"], "Bob");
    assert_eq!(json["summary"]["workoutCount"], 1);
}

#[test]
fn member_viewer_cannot_open_another_members_dashboard() {
    let env = CliTestEnv::new();

    let output = run_report(
        &env,
        &["--view", "member", "--member", "Ana", "--as-member", "Bob"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to build member dashboard"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn trends_and_leaderboard_render() {
    let env = CliTestEnv::new();

    let args = ["--view", "trends", "--export", "md"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let markdown = String::from_utf8_lossy(&output.stdout);
    assert!(markdown.contains("# Trends: March 2025"));
    assert!(markdown.contains("| Running |"));
    assert!(markdown.contains("| Yoga |"));

    let args = ["--view", "leaderboard", "--export", "json"];
    let output = run_report(&env, &args);
    assert_success(&args, &output);
    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("export should be valid json");
    assert_eq!(json["view"], "leaderboard");
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(2));
}

#[test]
fn program_dates_come_from_config() {
    let env = CliTestEnv::new();
    env.write_config(
        r#"
[program]
start_date = "2025-03-01"
end_date = "2025-03-31"
"#,
    );

    let output = run_report(&env, &[]);
    assert_success(&[], &output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Day 10 of 31 (32.3%), 21 days left"),
        "unexpected program line in:\n{stdout}"
    );
}

#[test]
fn invalid_record_aborts_with_error() {
    let env = CliTestEnv::with_snapshot(
        r#"{"logs": [
            {"member_name": "Ana", "workout_name": "Running", "date": "2025-13-01", "duration": 30}
        ]}"#,
    );

    let output = run_report(&env, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("snapshot contains invalid records"),
        "unexpected stderr:\n{stderr}"
    );
}

#[test]
fn unknown_range_and_export_are_rejected() {
    let env = CliTestEnv::new();

    let output = run_report(&env, &["--range", "decade"]);
    assert!(!output.status.success());

    let output = run_report(&env, &["--export", "pdf"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown export format"));
}
