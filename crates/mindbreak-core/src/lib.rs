//! # Mindbreak Core Library
//!
//! Core business logic for Mindbreak: deciding when a restriction applies
//! and which mindful intervention to present when it does. The library is
//! CLI-first; the surrounding application is a thin layer over the same
//! operations.
//!
//! ## Architecture
//!
//! - **Schedule Evaluator**: pure functions over a restriction's time rules
//!   and an instant -- active/inactive plus next transition times
//! - **Selection Engine**: candidate sourcing, variety and time-of-day
//!   filtering, history-driven scoring, and usage recording
//! - **Storage**: SQLite-backed usage log/custom activities/schedules and
//!   TOML-based preference configuration
//!
//! ## Key Components
//!
//! - [`Schedule`]: restriction time rules and their evaluator
//! - [`SelectionEngine`]: picks one activity per blocking event
//! - [`Catalog`]: built-in and user-authored activities
//! - [`UsageLog`]: bounded selection history feeding the scoring loop

pub mod activity;
pub mod catalog;
pub mod error;
pub mod history;
pub mod preferences;
pub mod schedule;
pub mod selection;
pub mod storage;

pub use activity::{Activity, ActivityCategory, ActivityContent, ActivityId};
pub use catalog::Catalog;
pub use error::{ConfigError, CoreError, StoreError, ValidationError};
pub use history::{UsageLog, UsageRecord};
pub use preferences::{HourOverride, Preferences};
pub use schedule::{RepeatRule, Schedule, TimeRange};
pub use selection::{CandidateSource, DayPart, Recommendation, SelectionEngine};
pub use storage::{HistoryDb, PreferencesStore};
