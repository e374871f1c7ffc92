//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/gymtrack/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/gymtrack/` (~/.config/gymtrack/)
//! - State/Logs: `$XDG_STATE_HOME/gymtrack/` (~/.local/state/gymtrack/)

use crate::analytics::{ProgramSchedule, TimeRange};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Training program date range
    #[serde(default)]
    pub program: ProgramConfig,

    /// Consistency scoring parameters
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Dashboard defaults
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Training program configuration
///
/// Dates are quoted `YYYY-MM-DD` strings in the TOML file.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct ProgramConfig {
    #[serde(default = "default_program_start")]
    pub start_date: NaiveDate,

    #[serde(default = "default_program_end")]
    pub end_date: NaiveDate,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            start_date: default_program_start(),
            end_date: default_program_end(),
        }
    }
}

impl ProgramConfig {
    /// The validated program schedule
    pub fn schedule(&self) -> Result<ProgramSchedule> {
        ProgramSchedule::new(self.start_date, self.end_date)
    }
}

fn default_program_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

fn default_program_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default()
}

/// Consistency scoring configuration
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct ScoringConfig {
    /// Ideal number of days between workouts
    #[serde(default = "default_ideal_gap_days")]
    pub ideal_gap_days: f64,

    /// Gap deviation (in days) at which regularity drops to zero
    #[serde(default = "default_gap_tolerance_days")]
    pub gap_tolerance_days: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ideal_gap_days: default_ideal_gap_days(),
            gap_tolerance_days: default_gap_tolerance_days(),
        }
    }
}

fn default_ideal_gap_days() -> f64 {
    2.0
}

fn default_gap_tolerance_days() -> f64 {
    7.0
}

/// Dashboard configuration
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct DashboardConfig {
    /// Time range used when none is requested
    #[serde(default)]
    pub default_time_range: TimeRange,

    /// Number of members in "top members" lists
    #[serde(default = "default_top_members")]
    pub top_members: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_time_range: TimeRange::default(),
            top_members: default_top_members(),
        }
    }
}

fn default_top_members() -> usize {
    5
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if self.program.end_date < self.program.start_date {
            return Err(Error::Config(format!(
                "program.end_date ({}) is before program.start_date ({})",
                self.program.end_date, self.program.start_date
            )));
        }
        if self.scoring.gap_tolerance_days <= 0.0 {
            return Err(Error::Config(
                "scoring.gap_tolerance_days must be positive".to_string(),
            ));
        }
        if self.scoring.ideal_gap_days < 0.0 {
            return Err(Error::Config(
                "scoring.ideal_gap_days must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/gymtrack/config.toml` (~/.config/gymtrack/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("gymtrack").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/gymtrack/` (~/.local/state/gymtrack/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("gymtrack")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/gymtrack/gymtrack.log` (~/.local/state/gymtrack/gymtrack.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("gymtrack.log")
    }
}
