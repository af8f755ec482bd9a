//! Intention selection: candidate sourcing, filtering, scoring, recording.

pub mod engine;
pub mod scoring;
pub mod windows;

pub use engine::{CandidateSource, Recommendation, SelectionEngine, VARIETY_WINDOW};
pub use scoring::{score_activity, ScoreInputs};
pub use windows::DayPart;
