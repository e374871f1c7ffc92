//! # gymtrack-core
//!
//! Core library for gymtrack - gym membership workout analytics.
//!
//! This library provides:
//! - Record types for members, workout types and workout logs, with
//!   validation of the raw records handed over by the data layer
//! - The analytics engine: windows, aggregation, streaks, trends,
//!   consistency scores, program progress and dashboard adapters
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Data flow
//!
//! - **Raw:** loosely typed records from the REST layer ([`RawSnapshot`])
//! - **Validated:** a read-only [`Snapshot`] for one aggregation call
//! - **Derived:** summaries, streaks, trends and scores, recomputed per call
//!
//! ## Example
//!
//! ```rust
//! use gymtrack_core::analytics::{build_overview, DashboardQuery, TimeRange};
//! use gymtrack_core::{Config, RawSnapshot, Snapshot};
//!
//! let raw = RawSnapshot::from_json(
//!     r#"{"members": [{"member_name": "Ana"}],
//!         "logs": [{"member_name": "Ana", "workout_name": "Running",
//!                   "date": "2025-03-01", "duration": 30}]}"#,
//! )
//! .expect("valid json");
//! let snapshot = Snapshot::try_from(raw).expect("valid records");
//!
//! let today = chrono::NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
//! let query = DashboardQuery::admin(TimeRange::Month, today);
//! let overview = build_overview(&snapshot, &query, &Config::default()).expect("overview");
//! assert_eq!(overview.totals.workout_count, 1);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod types;
