//! Calendar periods and date windows.
//!
//! Every date in the analytics is a UTC calendar date ([`NaiveDate`] taken
//! from [`Utc::now`]). Windows are inclusive at both ends.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Build a date from parts that are known to be in range.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Dashboard time range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    #[default]
    Month,
    Quarter,
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::Year => "year",
        }
    }

    /// Period-to-date window: first day of the current period through `today`.
    pub fn current_window(&self, today: NaiveDate) -> DateWindow {
        DateWindow::new(CalendarPeriod::containing(*self, today).start(), today)
    }

    /// The whole calendar period before the one containing `today`.
    pub fn previous_window(&self, today: NaiveDate) -> DateWindow {
        CalendarPeriod::containing(*self, today).previous().window()
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            _ => Err(Error::InvalidTimeRange(s.to_string())),
        }
    }
}

/// A concrete calendar period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPeriod {
    /// (year, month 1-12)
    Month(i32, u32),
    /// (year, quarter 1-4)
    Quarter(i32, u32),
    Year(i32),
}

impl CalendarPeriod {
    /// The period of kind `range` that contains `date`.
    pub fn containing(range: TimeRange, date: NaiveDate) -> Self {
        match range {
            TimeRange::Month => CalendarPeriod::Month(date.year(), date.month()),
            TimeRange::Quarter => CalendarPeriod::Quarter(date.year(), date.month0() / 3 + 1),
            TimeRange::Year => CalendarPeriod::Year(date.year()),
        }
    }

    /// First day of the period.
    pub fn start(&self) -> NaiveDate {
        match self {
            CalendarPeriod::Month(year, month) => ymd(*year, *month, 1),
            CalendarPeriod::Quarter(year, quarter) => ymd(*year, (quarter - 1) * 3 + 1, 1),
            CalendarPeriod::Year(year) => ymd(*year, 1, 1),
        }
    }

    /// Last day of the period (inclusive).
    pub fn end(&self) -> NaiveDate {
        self.next().start() - Duration::days(1)
    }

    fn next(&self) -> Self {
        match self {
            CalendarPeriod::Month(year, 12) => CalendarPeriod::Month(year + 1, 1),
            CalendarPeriod::Month(year, month) => CalendarPeriod::Month(*year, month + 1),
            CalendarPeriod::Quarter(year, 4) => CalendarPeriod::Quarter(year + 1, 1),
            CalendarPeriod::Quarter(year, quarter) => CalendarPeriod::Quarter(*year, quarter + 1),
            CalendarPeriod::Year(year) => CalendarPeriod::Year(year + 1),
        }
    }

    /// Get the previous period for trend comparison.
    pub fn previous(&self) -> Self {
        match self {
            CalendarPeriod::Month(year, 1) => CalendarPeriod::Month(year - 1, 12),
            CalendarPeriod::Month(year, month) => CalendarPeriod::Month(*year, month - 1),
            CalendarPeriod::Quarter(year, 1) => CalendarPeriod::Quarter(year - 1, 4),
            CalendarPeriod::Quarter(year, quarter) => CalendarPeriod::Quarter(*year, quarter - 1),
            CalendarPeriod::Year(year) => CalendarPeriod::Year(year - 1),
        }
    }

    /// The full period as a window.
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start(), self.end())
    }

    /// Get display name for this period.
    pub fn display_name(&self) -> String {
        match self {
            CalendarPeriod::Month(year, month) => format!("{} {}", month_name(*month), year),
            CalendarPeriod::Quarter(year, quarter) => format!("Q{} {}", quarter, year),
            CalendarPeriod::Year(year) => year.to_string(),
        }
    }
}

/// Full English month name for 1-12.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Every date in the window, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_windows() {
        let today = date(2025, 3, 15);
        let current = TimeRange::Month.current_window(today);
        assert_eq!(current, DateWindow::new(date(2025, 3, 1), today));

        let previous = TimeRange::Month.previous_window(today);
        assert_eq!(previous, DateWindow::new(date(2025, 2, 1), date(2025, 2, 28)));
    }

    #[test]
    fn test_january_wraps_to_previous_december() {
        let previous = TimeRange::Month.previous_window(date(2024, 1, 10));
        assert_eq!(previous, DateWindow::new(date(2023, 12, 1), date(2023, 12, 31)));
    }

    #[test]
    fn test_quarter_windows() {
        let today = date(2025, 5, 20);
        assert_eq!(
            CalendarPeriod::containing(TimeRange::Quarter, today),
            CalendarPeriod::Quarter(2025, 2)
        );
        assert_eq!(TimeRange::Quarter.current_window(today).start, date(2025, 4, 1));

        let previous = TimeRange::Quarter.previous_window(today);
        assert_eq!(previous, DateWindow::new(date(2025, 1, 1), date(2025, 3, 31)));

        let first = TimeRange::Quarter.previous_window(date(2025, 2, 1));
        assert_eq!(first, DateWindow::new(date(2024, 10, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_year_windows() {
        let today = date(2024, 7, 4);
        assert_eq!(TimeRange::Year.current_window(today).start, date(2024, 1, 1));
        assert_eq!(
            TimeRange::Year.previous_window(today),
            DateWindow::new(date(2023, 1, 1), date(2023, 12, 31))
        );
    }

    #[test]
    fn test_leap_february_end() {
        assert_eq!(CalendarPeriod::Month(2024, 2).end(), date(2024, 2, 29));
        assert_eq!(CalendarPeriod::Month(2024, 12).end(), date(2024, 12, 31));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(CalendarPeriod::Month(2025, 3).display_name(), "March 2025");
        assert_eq!(CalendarPeriod::Quarter(2025, 1).display_name(), "Q1 2025");
        assert_eq!(CalendarPeriod::Year(2025).display_name(), "2025");
    }

    #[test]
    fn test_time_range_parsing() {
        assert_eq!("Quarter".parse::<TimeRange>().unwrap(), TimeRange::Quarter);
        assert!("week".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Year.to_string(), "year");
    }

    #[test]
    fn test_window_days() {
        let window = DateWindow::new(date(2025, 2, 27), date(2025, 3, 2));
        assert_eq!(window.days().count(), 4);
        assert!(window.contains(date(2025, 3, 1)));
        assert!(!window.contains(date(2025, 3, 3)));

        let inverted = DateWindow::new(date(2025, 3, 2), date(2025, 3, 1));
        assert_eq!(inverted.days().count(), 0);
    }

    #[test]
    fn test_days_between_is_signed() {
        assert_eq!(days_between(date(2025, 3, 1), date(2025, 3, 3)), 2);
        assert_eq!(days_between(date(2025, 3, 3), date(2025, 3, 1)), -2);
    }
}
