//! Progress through a fixed training program.

use chrono::NaiveDate;
use serde::Serialize;

use super::period::{days_between, DateWindow};
use super::{ratio, round1};
use crate::error::{Error, Result};

/// Inclusive date range of a training program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramSchedule {
    start: NaiveDate,
    end: NaiveDate,
}

/// Where `today` falls in a program. All counts are inclusive days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramProgress {
    pub total_program_days: u32,
    /// The start day is day 1, the day before it 0, and earlier days negative.
    /// Not capped at the end.
    pub elapsed_program_days: i64,
    /// 0 once the program is over
    pub remaining_program_days: u32,
    /// Percentage, one decimal, capped at 100
    pub progress_percentage: f64,
}

impl ProgramProgress {
    pub fn is_complete(&self) -> bool {
        self.total_program_days > 0 && self.remaining_program_days == 0
    }
}

impl ProgramSchedule {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidProgramRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Inclusive program dates.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start, self.end)
    }

    pub fn progress(&self, today: NaiveDate) -> ProgramProgress {
        let total = days_between(self.start, self.end) + 1;
        let elapsed = days_between(self.start, today) + 1;
        let remaining = (total - elapsed).max(0);
        let percentage = round1((ratio(elapsed as f64, total as f64) * 100.0).clamp(0.0, 100.0));

        ProgramProgress {
            total_program_days: total as u32,
            elapsed_program_days: elapsed,
            remaining_program_days: remaining as u32,
            progress_percentage: percentage,
        }
    }
}
