//! Scoring algorithm for intention candidates.
//!
//! Each surviving candidate gets a fixed base plus history-driven terms:
//! completion rate in this context, completion rate at this hour, an overuse
//! penalty over the recent window, and a small category preference weight.
//! The weights are tuning constants, not correctness requirements.

use crate::activity::{Activity, ActivityCategory};
use crate::history::UsageLog;

/// Fixed base score every candidate starts from.
pub const BASE_SCORE: f64 = 50.0;
/// Completion-rate prior when no history exists for a key.
pub const COLD_START_RATE: f64 = 0.5;
/// Weight on the per-context completion rate.
pub const CONTEXT_RATE_WEIGHT: f64 = 30.0;
/// Weight on the per-hour completion rate.
pub const HOURLY_RATE_WEIGHT: f64 = 20.0;
/// Penalty per occurrence in the recent window.
pub const OVERUSE_PENALTY: f64 = 5.0;
/// Recent-window length for the overuse penalty.
pub const OVERUSE_WINDOW: usize = 10;
/// Weight on the category preference constant.
pub const CATEGORY_WEIGHT: f64 = 10.0;

/// Inputs shared by all candidates in one scoring pass.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInputs<'a> {
    /// Usage history backing the rate and overuse terms.
    pub log: &'a UsageLog,
    /// App or category identifier that triggered the selection.
    pub context_id: &'a str,
    /// Hour of day (0-23) of the selection instant.
    pub hour: u32,
}

/// Per-context completion history term (0-30 points).
pub fn context_history_score(activity: &Activity, inputs: &ScoreInputs) -> f64 {
    let rate = inputs
        .log
        .completion_rate(&activity.id, inputs.context_id)
        .unwrap_or(COLD_START_RATE);
    rate * CONTEXT_RATE_WEIGHT
}

/// Hour-of-day completion history term across all contexts (0-20 points).
pub fn hourly_history_score(activity: &Activity, inputs: &ScoreInputs) -> f64 {
    let rate = inputs
        .log
        .completion_rate_at_hour(&activity.id, inputs.hour)
        .unwrap_or(COLD_START_RATE);
    rate * HOURLY_RATE_WEIGHT
}

/// Overuse penalty: 5 points per occurrence in the last 10 records.
pub fn overuse_penalty(activity: &Activity, inputs: &ScoreInputs) -> f64 {
    inputs.log.count_in_recent(&activity.id, OVERUSE_WINDOW) as f64 * OVERUSE_PENALTY
}

/// Fixed per-category preference constant.
pub fn category_preference(category: ActivityCategory) -> f64 {
    match category {
        ActivityCategory::Breathing => 1.0,
        ActivityCategory::Mindfulness => 0.8,
        ActivityCategory::Movement => 0.6,
        ActivityCategory::Reflection => 0.5,
        ActivityCategory::QuickBreak => 0.4,
    }
}

/// Calculate the combined score for a candidate.
///
/// base 50 + context rate x 30 + hourly rate x 20 - overuse + category x 10.
pub fn score_activity(activity: &Activity, inputs: &ScoreInputs) -> f64 {
    let mut score = BASE_SCORE;
    score += context_history_score(activity, inputs);
    score += hourly_history_score(activity, inputs);
    score -= overuse_penalty(activity, inputs);
    score += category_preference(activity.category) * CATEGORY_WEIGHT;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::history::UsageRecord;
    use chrono::{TimeZone, Utc};

    fn ts(hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    fn inputs<'a>(log: &'a UsageLog) -> ScoreInputs<'a> {
        ScoreInputs {
            log,
            context_id: "com.example.app",
            hour: 9,
        }
    }

    #[test]
    fn cold_start_uses_prior() {
        let log = UsageLog::new();
        let catalog = Catalog::builtin();
        let activity = catalog.get("box-breathing").unwrap();
        // 50 + 0.5*30 + 0.5*20 - 0 + 1.0*10
        assert_eq!(score_activity(activity, &inputs(&log)), 85.0);
    }

    #[test]
    fn completed_history_raises_score() {
        let catalog = Catalog::builtin();
        let activity = catalog.get("box-breathing").unwrap();

        let mut log = UsageLog::new();
        log.push(UsageRecord::started("box-breathing", "com.example.app", ts(9)));
        log.record_completion("box-breathing", "com.example.app", ts(9));
        let with_history = score_activity(activity, &inputs(&log));

        let empty = UsageLog::new();
        let cold = score_activity(activity, &inputs(&empty));

        // Perfect completion rate beats the 0.5 prior, minus one overuse hit.
        assert_eq!(with_history, cold + 0.5 * 30.0 + 0.5 * 20.0 - 5.0);
    }

    #[test]
    fn overuse_penalty_counts_recent_window() {
        let catalog = Catalog::builtin();
        let activity = catalog.get("box-breathing").unwrap();

        let mut log = UsageLog::new();
        for _ in 0..12 {
            log.push(UsageRecord::started("box-breathing", "other-app", ts(14)));
        }
        // Capped by the 10-record window.
        assert_eq!(overuse_penalty(activity, &inputs(&log)), 50.0);
    }

    #[test]
    fn abandoned_records_lower_the_rate_term() {
        let catalog = Catalog::builtin();
        let activity = catalog.get("box-breathing").unwrap();

        let mut log = UsageLog::new();
        // Two abandoned selections in this context.
        log.push(UsageRecord::started("box-breathing", "com.example.app", ts(9)));
        log.push(UsageRecord::started("box-breathing", "com.example.app", ts(9)));

        let score = context_history_score(activity, &inputs(&log));
        assert_eq!(score, 0.0);
    }

    #[test]
    fn category_preference_is_total() {
        for cat in ActivityCategory::all() {
            let w = category_preference(cat);
            assert!(w > 0.0 && w <= 1.0);
        }
    }
}
