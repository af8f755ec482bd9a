//! Usage history: the append-only selection log feeding future scoring.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::activity::ActivityId;

/// Default bound on retained usage records.
pub const DEFAULT_LOG_CAP: usize = 1000;

/// One logged selection, with optional completion outcome.
///
/// A record without a completion is implicitly abandoned; there is no
/// separate terminal status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Selected activity.
    pub activity_id: ActivityId,
    /// App or category identifier that triggered the selection.
    pub context_id: String,
    /// When the selection was made.
    pub selected_at: DateTime<Utc>,
    /// Whether the activity was completed.
    #[serde(default)]
    pub completed: bool,
    /// When the completion was reported.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl UsageRecord {
    /// A fresh, not-yet-completed record.
    pub fn started(
        activity_id: impl Into<ActivityId>,
        context_id: impl Into<String>,
        selected_at: DateTime<Utc>,
    ) -> Self {
        Self {
            activity_id: activity_id.into(),
            context_id: context_id.into(),
            selected_at,
            completed: false,
            completed_at: None,
        }
    }
}

/// Bounded, newest-first log of usage records.
#[derive(Debug, Clone)]
pub struct UsageLog {
    records: VecDeque<UsageRecord>,
    cap: usize,
}

impl UsageLog {
    /// Empty log with the default cap.
    pub fn new() -> Self {
        Self::with_cap(DEFAULT_LOG_CAP)
    }

    /// Empty log with an explicit cap.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            records: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    /// Rebuild a log from stored records, newest first. Records beyond the
    /// cap are discarded.
    pub fn from_records(records: Vec<UsageRecord>, cap: usize) -> Self {
        let mut log = Self::with_cap(cap);
        log.records = records.into_iter().take(log.cap).collect();
        log
    }

    /// Push a new selection to the front, evicting the oldest past the cap.
    pub fn push(&mut self, record: UsageRecord) {
        self.records.push_front(record);
        while self.records.len() > self.cap {
            self.records.pop_back();
        }
    }

    /// Mark the most recent open record for `(activity, context)` completed.
    ///
    /// Returns false (a no-op, not an error) when no open record matches,
    /// which makes repeated completion reports idempotent per record.
    pub fn record_completion(
        &mut self,
        activity_id: &str,
        context_id: &str,
        at: DateTime<Utc>,
    ) -> bool {
        if let Some(record) = self.records.iter_mut().find(|r| {
            !r.completed && r.activity_id == activity_id && r.context_id == context_id
        }) {
            record.completed = true;
            record.completed_at = Some(at);
            true
        } else {
            false
        }
    }

    /// Records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &UsageRecord> {
        self.records.iter()
    }

    /// The `n` most recent records.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &UsageRecord> {
        self.records.iter().take(n)
    }

    /// Ids of the `n` most recent selections.
    pub fn recent_ids(&self, n: usize) -> Vec<&ActivityId> {
        self.recent(n).map(|r| &r.activity_id).collect()
    }

    /// How often `activity_id` appears in the `n` most recent records.
    pub fn count_in_recent(&self, activity_id: &str, n: usize) -> usize {
        self.recent(n).filter(|r| r.activity_id == activity_id).count()
    }

    /// Completion rate for `(activity, context)`, `None` without history.
    pub fn completion_rate(&self, activity_id: &str, context_id: &str) -> Option<f64> {
        Self::rate(
            self.records
                .iter()
                .filter(|r| r.activity_id == activity_id && r.context_id == context_id),
        )
    }

    /// Completion rate for `activity_id` at a given hour of day, across all
    /// contexts. `None` without history.
    pub fn completion_rate_at_hour(&self, activity_id: &str, hour: u32) -> Option<f64> {
        Self::rate(
            self.records
                .iter()
                .filter(|r| r.activity_id == activity_id && r.selected_at.hour() == hour),
        )
    }

    /// Selections made on `date` (UTC).
    pub fn selections_on(&self, date: NaiveDate) -> usize {
        self.records
            .iter()
            .filter(|r| r.selected_at.date_naive() == date)
            .count()
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The configured cap.
    pub fn cap(&self) -> usize {
        self.cap
    }

    fn rate<'a>(records: impl Iterator<Item = &'a UsageRecord>) -> Option<f64> {
        let mut total = 0usize;
        let mut completed = 0usize;
        for record in records {
            total += 1;
            if record.completed {
                completed += 1;
            }
        }
        if total == 0 {
            None
        } else {
            Some(completed as f64 / total as f64)
        }
    }
}

impl Default for UsageLog {
    fn default() -> Self {
        Self::new()
    }
}
