//! Error types for gymtrack-core

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the gymtrack-core library
#[derive(Error, Debug)]
pub enum Error {
    /// A record handed over by the data collaborator is malformed
    #[error("invalid {record}: {field} {message}")]
    Validation {
        record: String,
        field: &'static str,
        message: String,
    },

    /// Unknown time range selector
    #[error("unknown time range: {0} (expected month, quarter or year)")]
    InvalidTimeRange(String),

    /// Program end date precedes its start date
    #[error("program range is inverted: {start} is after {end}")]
    InvalidProgramRange { start: NaiveDate, end: NaiveDate },

    /// Member not present in the snapshot
    #[error("member not found: {0}")]
    UnknownMember(String),

    /// Viewer may not see the requested member
    #[error("not permitted to view member: {0}")]
    Forbidden(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn validation(
        record: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Error::Validation {
            record: record.into(),
            field,
            message: message.into(),
        }
    }

    /// Re-label a validation error with the record's position in its batch.
    pub(crate) fn at_index(self, index: usize) -> Self {
        match self {
            Error::Validation {
                record,
                field,
                message,
            } => Error::Validation {
                record: format!("{} #{}", record, index),
                field,
                message,
            },
            other => other,
        }
    }
}

/// Result type alias for gymtrack-core
pub type Result<T> = std::result::Result<T, Error>;
