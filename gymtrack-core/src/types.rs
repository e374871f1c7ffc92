//! Core domain types for gymtrack
//!
//! These types represent the read-only snapshot a single aggregation call
//! works on. Records arrive from the data collaborator as loosely typed
//! [`LogRecord`]s, [`MemberRecord`]s and [`WorkoutTypeRecord`]s and are
//! validated exactly once, here, into the strict types the analytics use.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Member** | A gym member; `member_name` is the identity key everywhere |
//! | **Workout type** | A kind of session offered by the gym (Running, Yoga, ...) |
//! | **Workout log** | One completed session by one member on one date |
//! | **Snapshot** | The members, workout types and logs for one aggregation call |
//!
//! All dates are calendar dates in UTC. Date strings are parsed as
//! `YYYY-MM-DD` at this boundary and never again.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================
// Validated records
// ============================================

/// A gym member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// Unique name, used as identity key
    pub member_name: String,
    pub gender: Option<String>,
    pub age: Option<u32>,
    /// When present, the member is only eligible for windows ending on or after this date
    pub date_joined: Option<NaiveDate>,
}

impl Member {
    /// Create a member with only a name.
    pub fn new(member_name: impl Into<String>) -> Self {
        Self {
            member_name: member_name.into(),
            gender: None,
            age: None,
            date_joined: None,
        }
    }

    /// Set the join date.
    pub fn joined(mut self, date: NaiveDate) -> Self {
        self.date_joined = Some(date);
        self
    }

    /// Whether the member had joined by `date`.
    pub fn joined_by(&self, date: NaiveDate) -> bool {
        self.date_joined.map_or(true, |joined| joined <= date)
    }
}

/// A kind of workout offered by the gym.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct WorkoutType {
    pub workout_name: String,
}

impl WorkoutType {
    pub fn new(workout_name: impl Into<String>) -> Self {
        Self {
            workout_name: workout_name.into(),
        }
    }
}

/// One completed workout session.
///
/// Duplicate `(member_name, workout_name, date)` triples are distinct events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutLog {
    pub member_name: String,
    pub workout_name: String,
    pub date: NaiveDate,
    /// Minutes
    pub duration: u32,
}

impl WorkoutLog {
    pub fn new(
        member_name: impl Into<String>,
        workout_name: impl Into<String>,
        date: NaiveDate,
        duration: u32,
    ) -> Self {
        Self {
            member_name: member_name.into(),
            workout_name: workout_name.into(),
            date,
            duration,
        }
    }
}

// ============================================
// Raw records
// ============================================

/// A workout log as delivered by the data collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogRecord {
    pub member_name: Option<String>,
    pub workout_name: Option<String>,
    pub date: Option<String>,
    pub duration: Option<i64>,
}

/// A member as delivered by the data collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberRecord {
    pub member_name: Option<String>,
    pub gender: Option<String>,
    pub age: Option<u32>,
    pub date_joined: Option<String>,
}

/// A workout type as delivered by the data collaborator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkoutTypeRecord {
    pub workout_name: Option<String>,
}

fn required_name(value: Option<String>, record: &str, field: &'static str) -> Result<String> {
    match value {
        Some(name) if !name.trim().is_empty() => Ok(name),
        Some(_) => Err(Error::validation(record, field, "is blank")),
        None => Err(Error::validation(record, field, "is missing")),
    }
}

/// Parse a `YYYY-MM-DD` date string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn parse_date_field(value: &str, record: &str, field: &'static str) -> Result<NaiveDate> {
    parse_date(value).ok_or_else(|| {
        Error::validation(
            record,
            field,
            format!("'{}' is not a YYYY-MM-DD date", value),
        )
    })
}

impl TryFrom<LogRecord> for WorkoutLog {
    type Error = Error;

    fn try_from(raw: LogRecord) -> Result<Self> {
        const RECORD: &str = "workout log";

        let member_name = required_name(raw.member_name, RECORD, "member_name")?;
        let workout_name = required_name(raw.workout_name, RECORD, "workout_name")?;
        let date = match raw.date {
            Some(value) => parse_date_field(&value, RECORD, "date")?,
            None => return Err(Error::validation(RECORD, "date", "is missing")),
        };
        let duration = match raw.duration {
            Some(minutes) => u32::try_from(minutes).map_err(|_| {
                Error::validation(
                    RECORD,
                    "duration",
                    format!("{} is not a non-negative minute count", minutes),
                )
            })?,
            None => return Err(Error::validation(RECORD, "duration", "is missing")),
        };

        Ok(WorkoutLog {
            member_name,
            workout_name,
            date,
            duration,
        })
    }
}

impl TryFrom<MemberRecord> for Member {
    type Error = Error;

    fn try_from(raw: MemberRecord) -> Result<Self> {
        const RECORD: &str = "member";

        let member_name = required_name(raw.member_name, RECORD, "member_name")?;
        let date_joined = match raw.date_joined.as_deref() {
            Some(value) if !value.trim().is_empty() => {
                Some(parse_date_field(value, RECORD, "date_joined")?)
            }
            _ => None,
        };

        Ok(Member {
            member_name,
            gender: raw.gender,
            age: raw.age,
            date_joined,
        })
    }
}

impl TryFrom<WorkoutTypeRecord> for WorkoutType {
    type Error = Error;

    fn try_from(raw: WorkoutTypeRecord) -> Result<Self> {
        let workout_name = required_name(raw.workout_name, "workout type", "workout_name")?;
        Ok(WorkoutType { workout_name })
    }
}

// ============================================
// Snapshot
// ============================================

/// Unvalidated snapshot, as deserialized from the data collaborator's payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub workouts: Vec<WorkoutTypeRecord>,
    #[serde(default)]
    pub logs: Vec<LogRecord>,
}

impl RawSnapshot {
    /// Parse a JSON payload of the form `{"members": [...], "workouts": [...], "logs": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Validated, read-only input for one aggregation call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub members: Vec<Member>,
    pub workouts: Vec<WorkoutType>,
    pub logs: Vec<WorkoutLog>,
}

impl Snapshot {
    pub fn new(members: Vec<Member>, workouts: Vec<WorkoutType>, logs: Vec<WorkoutLog>) -> Self {
        Self {
            members,
            workouts,
            logs,
        }
    }

    /// Look up a member by name.
    pub fn member(&self, member_name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.member_name == member_name)
    }

    /// Logs belonging to one member.
    pub fn logs_for(&self, member_name: &str) -> Vec<WorkoutLog> {
        self.logs
            .iter()
            .filter(|log| log.member_name == member_name)
            .cloned()
            .collect()
    }
}

fn validate_all<R, T>(records: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = Error>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            T::try_from(raw).map_err(|e| {
                let e = e.at_index(index);
                tracing::warn!(error = %e, "Rejected snapshot record");
                e
            })
        })
        .collect()
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = Error;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        Ok(Snapshot {
            members: validate_all(raw.members)?,
            workouts: validate_all(raw.workouts)?,
            logs: validate_all(raw.logs)?,
        })
    }
}
