//! Selection engine: sourcing, filtering, ranking, and recording.

use chrono::{DateTime, Timelike, Utc};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};

use super::scoring::{score_activity, ScoreInputs};
use super::windows::DayPart;
use crate::activity::{Activity, ActivityId};
use crate::catalog::Catalog;
use crate::history::{UsageLog, UsageRecord};
use crate::preferences::Preferences;

/// Recent-window length for the variety filter.
pub const VARIETY_WINDOW: usize = 5;

/// Where a recommendation's candidate set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Per-app override list matched the context.
    AppOverride,
    /// Per-category override list matched the context.
    CategoryOverride,
    /// Preferred-category filter over the full catalog.
    PreferredCategories,
    /// Full catalog fallback.
    FullCatalog,
    /// Uniform random pick after all filtering emptied the set.
    RandomFallback,
}

/// A scored recommendation, for side-effect-free previews.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub activity: Activity,
    pub score: f64,
    pub source: CandidateSource,
}

/// Intention selection engine.
///
/// Holds the activity catalog and the usage history; the history mutation in
/// [`select`](Self::select) is a single critical section, so near-simultaneous
/// triggers each see the other's effect on the overuse penalty and the
/// bounded eviction never drops a just-written entry.
pub struct SelectionEngine {
    catalog: Catalog,
    history: Mutex<UsageLog>,
    rng: Mutex<Pcg64>,
}

impl SelectionEngine {
    /// Engine over a catalog with an empty history.
    pub fn new(catalog: Catalog) -> Self {
        Self::with_history(catalog, UsageLog::new())
    }

    /// Engine over a catalog with a previously loaded history.
    pub fn with_history(catalog: Catalog, history: UsageLog) -> Self {
        Self {
            catalog,
            history: Mutex::new(history),
            rng: Mutex::new(Pcg64::from_entropy()),
        }
    }

    /// Engine with a deterministic random fallback, for reproducible runs.
    pub fn with_seed(catalog: Catalog, history: UsageLog, seed: u64) -> Self {
        Self {
            catalog,
            history: Mutex::new(history),
            rng: Mutex::new(Pcg64::seed_from_u64(seed)),
        }
    }

    /// The catalog this engine selects from.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Select one activity for a blocking event and record the decision.
    ///
    /// Never fails: empty candidate sets fall through stage by stage down to
    /// a uniform random pick from the full catalog.
    pub fn select(&self, context_id: &str, prefs: &Preferences, now: DateTime<Utc>) -> Activity {
        let hour = now.hour();
        let (candidates, _source) = self.source_candidates(context_id, prefs);

        let mut history = lock(&self.history);
        let chosen = if prefs.smart_selection {
            let filtered = self.apply_filters(candidates, prefs, &history, hour);
            filtered
                .iter()
                .map(|a| {
                    let inputs = ScoreInputs {
                        log: &history,
                        context_id,
                        hour,
                    };
                    (*a, score_activity(a, &inputs))
                })
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(a, _)| a.clone())
                .unwrap_or_else(|| self.random_pick(self.catalog.all()))
        } else {
            // Smart selection off: uniform pick from the sourced candidates.
            self.random_pick_refs(&candidates)
        };

        history.push(UsageRecord::started(chosen.id.clone(), context_id, now));
        chosen
    }

    /// Rank candidates and return the top `count`, without recording.
    pub fn recommend(
        &self,
        context_id: &str,
        prefs: &Preferences,
        now: DateTime<Utc>,
        count: usize,
    ) -> Vec<Recommendation> {
        let hour = now.hour();
        let (candidates, source) = self.source_candidates(context_id, prefs);
        let history = lock(&self.history);
        let filtered = self.apply_filters(candidates, prefs, &history, hour);

        let inputs = ScoreInputs {
            log: &history,
            context_id,
            hour,
        };
        let mut scored: Vec<(&Activity, f64)> = filtered
            .into_iter()
            .map(|a| (a, score_activity(a, &inputs)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(count)
            .map(|(activity, score)| Recommendation {
                activity: activity.clone(),
                score,
                source,
            })
            .collect()
    }

    /// Report a completion for the most recent open record matching
    /// `(activity, context)`. Returns false when nothing matched; a report
    /// with no open record is discarded, not an error.
    pub fn record_completion(
        &self,
        activity_id: &str,
        context_id: &str,
        at: DateTime<Utc>,
    ) -> bool {
        lock(&self.history).record_completion(activity_id, context_id, at)
    }

    /// Selections recorded on the calendar date of `now`.
    pub fn selections_today(&self, now: DateTime<Utc>) -> usize {
        lock(&self.history).selections_on(now.date_naive())
    }

    /// Whether today's selections have reached the advisory `max_daily`
    /// preference. Selection itself never refuses; this is for callers.
    pub fn daily_limit_reached(&self, prefs: &Preferences, now: DateTime<Utc>) -> bool {
        self.selections_today(now) >= prefs.max_daily as usize
    }

    /// Snapshot of the in-memory history, for persistence.
    pub fn history_snapshot(&self) -> UsageLog {
        lock(&self.history).clone()
    }

    /// Candidate sourcing, first non-empty stage wins: app override ->
    /// category override -> preferred categories -> full catalog.
    fn source_candidates<'a>(
        &'a self,
        context_id: &str,
        prefs: &Preferences,
    ) -> (Vec<&'a Activity>, CandidateSource) {
        if let Some(ids) = prefs.app_overrides.get(context_id) {
            let found = self.resolve_ids(ids);
            if !found.is_empty() {
                return (found, CandidateSource::AppOverride);
            }
        }
        if let Some(ids) = prefs.category_overrides.get(context_id) {
            let found = self.resolve_ids(ids);
            if !found.is_empty() {
                return (found, CandidateSource::CategoryOverride);
            }
        }
        let preferred: Vec<&Activity> = self
            .catalog
            .all()
            .iter()
            .filter(|a| prefs.preferred_categories.contains(&a.category))
            .collect();
        if !preferred.is_empty() {
            return (preferred, CandidateSource::PreferredCategories);
        }
        (self.catalog.all().iter().collect(), CandidateSource::FullCatalog)
    }

    /// Variety filter then time-of-day filter, each skipped rather than
    /// allowed to empty the candidate set.
    fn apply_filters<'a>(
        &self,
        candidates: Vec<&'a Activity>,
        prefs: &Preferences,
        history: &UsageLog,
        hour: u32,
    ) -> Vec<&'a Activity> {
        let candidates = if prefs.variety_enabled {
            let recent = history.recent_ids(VARIETY_WINDOW);
            let fresh: Vec<&Activity> = candidates
                .iter()
                .copied()
                .filter(|a| !recent.contains(&&a.id))
                .collect();
            if fresh.is_empty() {
                candidates
            } else {
                fresh
            }
        } else {
            candidates
        };

        // Explicit hour override beats the fixed windows when it matches.
        if let Some(ov) = prefs.hour_override_for(hour as u8) {
            let matched: Vec<&Activity> = candidates
                .iter()
                .copied()
                .filter(|a| ov.activities.contains(&a.id))
                .collect();
            if !matched.is_empty() {
                return matched;
            }
        }

        let part = DayPart::from_hour(hour);
        let windowed: Vec<&Activity> = candidates
            .iter()
            .copied()
            .filter(|a| part.preferred_categories().contains(&a.category))
            .collect();
        if windowed.is_empty() {
            candidates
        } else {
            windowed
        }
    }

    fn resolve_ids(&self, ids: &[ActivityId]) -> Vec<&Activity> {
        ids.iter().filter_map(|id| self.catalog.get(id)).collect()
    }

    fn random_pick(&self, pool: &[Activity]) -> Activity {
        // The catalog always contains the built-ins, so the pool is never
        // empty here.
        let mut rng = lock(&self.rng);
        let idx = rng.gen_range(0..pool.len());
        pool[idx].clone()
    }

    fn random_pick_refs(&self, pool: &[&Activity]) -> Activity {
        let mut rng = lock(&self.rng);
        let idx = rng.gen_range(0..pool.len());
        pool[idx].clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    fn engine() -> SelectionEngine {
        SelectionEngine::with_seed(Catalog::builtin(), UsageLog::new(), 42)
    }

    #[test]
    fn app_override_short_circuits_scoring() {
        let mut prefs = Preferences::default();
        prefs
            .app_overrides
            .insert("com.example.app".to_string(), vec!["box-breathing".to_string()]);

        let engine = engine();
        for hour in [7, 13, 16, 20, 2] {
            let activity = engine.select("com.example.app", &prefs, ts(hour));
            assert_eq!(activity.id, "box-breathing");
        }
    }

    #[test]
    fn override_survives_variety_suppression() {
        // The override target sits in the last 5 records; the variety filter
        // would empty the set, so it must be skipped.
        let mut prefs = Preferences::default();
        prefs
            .app_overrides
            .insert("com.example.app".to_string(), vec!["box-breathing".to_string()]);

        let engine = engine();
        for _ in 0..6 {
            let activity = engine.select("com.example.app", &prefs, ts(9));
            assert_eq!(activity.id, "box-breathing");
        }
    }

    #[test]
    fn category_override_used_when_no_app_override() {
        let mut prefs = Preferences::default();
        prefs
            .category_overrides
            .insert("social".to_string(), vec!["body-scan".to_string()]);

        let engine = engine();
        assert_eq!(engine.select("social", &prefs, ts(9)).id, "body-scan");
    }

    #[test]
    fn unknown_override_ids_fall_through() {
        let mut prefs = Preferences::default();
        prefs
            .app_overrides
            .insert("com.example.app".to_string(), vec!["no-such-activity".to_string()]);

        let engine = engine();
        let activity = engine.select("com.example.app", &prefs, ts(9));
        assert!(engine.catalog().get(&activity.id).is_some());
    }

    #[test]
    fn default_select_returns_catalog_member_and_records_once() {
        let engine = engine();
        let prefs = Preferences::default();

        let activity = engine.select("com.unmapped.app", &prefs, ts(10));
        assert!(engine.catalog().get(&activity.id).is_some());

        let log = engine.history_snapshot();
        assert_eq!(log.len(), 1);
        let record = log.records().next().unwrap().clone();
        assert_eq!(record.activity_id, activity.id);
        assert_eq!(record.context_id, "com.unmapped.app");
        assert!(!record.completed);
    }

    #[test]
    fn select_never_leaves_the_catalog() {
        let engine = engine();
        let prefs = Preferences::default();
        for i in 0..50 {
            let activity = engine.select(&format!("ctx{}", i % 4), &prefs, ts(i % 24));
            assert!(engine.catalog().get(&activity.id).is_some());
        }
    }

    #[test]
    fn variety_spreads_consecutive_selections() {
        let engine = engine();
        let prefs = Preferences::default();

        let first = engine.select("app", &prefs, ts(9)).id;
        let second = engine.select("app", &prefs, ts(9)).id;
        assert_ne!(first, second, "variety filter must suppress the last pick");
    }

    #[test]
    fn variety_disabled_allows_repeats() {
        let prefs = Preferences {
            variety_enabled: false,
            ..Default::default()
        };
        let mut with_override = prefs.clone();
        with_override
            .app_overrides
            .insert("app".to_string(), vec!["box-breathing".to_string()]);

        let engine = engine();
        assert_eq!(engine.select("app", &with_override, ts(9)).id, "box-breathing");
        assert_eq!(engine.select("app", &with_override, ts(9)).id, "box-breathing");
    }

    #[test]
    fn time_window_shapes_default_selection() {
        let engine = engine();
        let prefs = Preferences::default();
        // Evening window prefers reflection/mindfulness.
        let activity = engine.select("app", &prefs, ts(20));
        let part = DayPart::from_hour(20);
        assert!(part.preferred_categories().contains(&activity.category));
    }

    #[test]
    fn hour_override_beats_fixed_windows() {
        let prefs = Preferences {
            hour_overrides: vec![crate::preferences::HourOverride {
                start_hour: 20,
                end_hour: 22,
                activities: vec!["short-walk".to_string()],
            }],
            ..Default::default()
        };

        let engine = engine();
        // Evening window alone would exclude movement.
        assert_eq!(engine.select("app", &prefs, ts(20)).id, "short-walk");
    }

    #[test]
    fn recommend_is_side_effect_free_and_ordered() {
        let engine = engine();
        let prefs = Preferences::default();

        let recs = engine.recommend("app", &prefs, ts(9), 3);
        assert!(!recs.is_empty());
        assert!(recs.len() <= 3);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(engine.history_snapshot().is_empty());
    }

    #[test]
    fn recommend_reports_candidate_source() {
        let mut prefs = Preferences::default();
        prefs
            .app_overrides
            .insert("app".to_string(), vec!["box-breathing".to_string()]);

        let engine = engine();
        let recs = engine.recommend("app", &prefs, ts(9), 1);
        assert_eq!(recs[0].source, CandidateSource::AppOverride);
    }

    #[test]
    fn completion_feedback_loop() {
        let engine = engine();
        let prefs = Preferences::default();

        let activity = engine.select("app", &prefs, ts(9));
        assert!(engine.record_completion(&activity.id, "app", ts(10)));
        // No open record remains.
        assert!(!engine.record_completion(&activity.id, "app", ts(11)));

        let log = engine.history_snapshot();
        assert!(log.records().next().unwrap().completed);
    }

    #[test]
    fn daily_limit_is_advisory() {
        let prefs = Preferences {
            max_daily: 2,
            ..Default::default()
        };
        let engine = engine();

        assert!(!engine.daily_limit_reached(&prefs, ts(9)));
        engine.select("app", &prefs, ts(9));
        engine.select("app", &prefs, ts(10));
        assert!(engine.daily_limit_reached(&prefs, ts(11)));
        // Still produces a selection.
        let activity = engine.select("app", &prefs, ts(11));
        assert!(engine.catalog().get(&activity.id).is_some());
    }

    #[test]
    fn smart_selection_off_picks_uniformly_from_candidates() {
        let prefs = Preferences {
            smart_selection: false,
            ..Default::default()
        };
        let engine = engine();
        let activity = engine.select("app", &prefs, ts(9));
        assert!(engine.catalog().get(&activity.id).is_some());
        assert_eq!(engine.history_snapshot().len(), 1);
    }

    #[test]
    fn scoring_prefers_historically_completed_activity() {
        let mut log = UsageLog::new();
        // five-senses completed often in this context at other times.
        for hour in [7, 8] {
            log.push(UsageRecord::started("five-senses", "app", ts(hour)));
            log.record_completion("five-senses", "app", ts(hour));
        }
        let engine = SelectionEngine::with_seed(Catalog::builtin(), log, 7);

        let prefs = Preferences {
            variety_enabled: false,
            ..Default::default()
        };
        // Afternoon window includes mindfulness; both candidates present.
        let recs = engine.recommend("app", &prefs, ts(16), 10);
        let five_senses = recs.iter().find(|r| r.activity.id == "five-senses").unwrap();
        let body_scan = recs.iter().find(|r| r.activity.id == "body-scan").unwrap();
        assert!(five_senses.score > body_scan.score);
    }
}
