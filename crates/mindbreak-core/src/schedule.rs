//! Restriction schedules and their pure evaluator.
//!
//! A [`Schedule`] describes when a restriction applies: time-of-day ranges
//! (possibly wrapping past midnight), active weekdays, optional absolute date
//! bounds, and exception dates that suppress the rule. Evaluation is
//! read-only and side-effect free; a logically malformed schedule evaluates
//! as "not active" with a diagnostic, never a panic.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// Forward search horizon for [`Schedule::next_start`], in days.
const NEXT_START_HORIZON_DAYS: i64 = 7;

/// A time-of-day range in minutes since midnight.
///
/// `start > end` denotes an overnight range (e.g. 22:00-06:00). Boundary
/// minutes are inside the range on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl TimeRange {
    /// Build a range from wall-clock hours and minutes.
    pub fn new(start_hour: u16, start_min: u16, end_hour: u16, end_min: u16) -> Self {
        Self {
            start_minute: start_hour * 60 + start_min,
            end_minute: end_hour * 60 + end_min,
        }
    }

    /// Whether both bounds are valid minute-of-day values.
    pub fn is_valid(&self) -> bool {
        self.start_minute < MINUTES_PER_DAY && self.end_minute < MINUTES_PER_DAY
    }

    /// Whether this range wraps past midnight.
    pub fn is_overnight(&self) -> bool {
        self.start_minute > self.end_minute
    }

    /// Whether `minute` (minute-of-day) falls inside the range, inclusive
    /// on both boundaries.
    pub fn contains(&self, minute: u16) -> bool {
        if self.is_overnight() {
            minute >= self.start_minute || minute <= self.end_minute
        } else {
            minute >= self.start_minute && minute <= self.end_minute
        }
    }

    /// Range length in minutes, counting both boundary minutes as inside.
    pub fn duration_minutes(&self) -> u16 {
        if self.is_overnight() {
            MINUTES_PER_DAY - self.start_minute + self.end_minute + 1
        } else {
            self.end_minute - self.start_minute + 1
        }
    }
}

/// Repeat classification, used only to derive a default weekday set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatRule {
    Daily,
    Weekdays,
    Weekends,
    Weekly,
    Monthly,
    Custom,
}

impl RepeatRule {
    /// Default weekday set for this rule, encoded as days-from-Sunday
    /// (0 = Sunday .. 6 = Saturday).
    pub fn default_days(&self) -> Vec<u8> {
        match self {
            RepeatRule::Daily | RepeatRule::Weekly | RepeatRule::Monthly | RepeatRule::Custom => {
                vec![0, 1, 2, 3, 4, 5, 6]
            }
            RepeatRule::Weekdays => vec![1, 2, 3, 4, 5],
            RepeatRule::Weekends => vec![0, 6],
        }
    }
}

impl Default for RepeatRule {
    fn default() -> Self {
        RepeatRule::Daily
    }
}

/// One restriction's temporal rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the restriction is enforced at all.
    pub enabled: bool,
    /// Active time-of-day ranges. Empty means never active.
    #[serde(default)]
    pub ranges: Vec<TimeRange>,
    /// Active weekdays, days-from-Sunday encoding (0 = Sunday .. 6 = Saturday).
    #[serde(default)]
    pub days: Vec<u8>,
    /// Inclusive absolute start bound.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive absolute end bound.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Dates on which the rule is suppressed.
    #[serde(default)]
    pub exceptions: Vec<NaiveDate>,
    /// Repeat classification behind the default weekday set.
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl Schedule {
    /// Create an enabled schedule with the repeat rule's default weekdays.
    pub fn new(id: impl Into<String>, name: impl Into<String>, repeat: RepeatRule) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            ranges: Vec::new(),
            days: repeat.default_days(),
            start_date: None,
            end_date: None,
            exceptions: Vec::new(),
            repeat,
        }
    }

    /// Whether the restriction is active at `instant`.
    ///
    /// Short-circuiting preconditions, in order: disabled; outside the
    /// absolute date bounds; weekday not active; exception date; otherwise
    /// active iff any time range contains the instant's minute-of-day.
    pub fn is_active_at(&self, instant: NaiveDateTime) -> bool {
        if !self.enabled {
            return false;
        }
        let date = instant.date();
        if !self.date_in_bounds(date) {
            return false;
        }
        if !self.day_active(date) {
            return false;
        }
        if self.exceptions.contains(&date) {
            return false;
        }
        let minute = minute_of_day(instant);
        self.valid_ranges().any(|r| r.contains(minute))
    }

    /// Earliest range start strictly after `from`, searching up to
    /// seven days ahead. `None` for disabled schedules or when no qualifying
    /// day exists within the horizon.
    pub fn next_start(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.enabled {
            return None;
        }

        // Later today, if today qualifies.
        let today = from.date();
        if self.day_qualifies(today) {
            let minute = minute_of_day(from);
            let next_today = self
                .valid_ranges()
                .map(|r| r.start_minute)
                .filter(|&start| start > minute)
                .min();
            if let Some(start) = next_today {
                return at_minute(today, start);
            }
        }

        // Scan forward day by day.
        for offset in 1..=NEXT_START_HORIZON_DAYS {
            let date = today + Duration::days(offset);
            if !self.day_qualifies(date) {
                continue;
            }
            if let Some(start) = self.valid_ranges().map(|r| r.start_minute).min() {
                return at_minute(date, start);
            }
        }
        None
    }

    /// Earliest upcoming end of a range containing `from`. Only meaningful
    /// while active; `None` otherwise. For an overnight range entered before
    /// midnight, the end lands on the following day.
    pub fn next_end(&self, from: NaiveDateTime) -> Option<NaiveDateTime> {
        if !self.is_active_at(from) {
            return None;
        }
        let minute = minute_of_day(from);
        let date = from.date();
        self.valid_ranges()
            .filter(|r| r.contains(minute))
            .filter_map(|r| {
                if r.is_overnight() && minute >= r.start_minute {
                    // Crosses midnight; end is tomorrow.
                    at_minute(date + Duration::days(1), r.end_minute)
                } else {
                    at_minute(date, r.end_minute)
                }
            })
            .min()
    }

    /// Ranges with valid minute-of-day bounds. Malformed ranges are skipped
    /// with a diagnostic so evaluation stays total.
    fn valid_ranges(&self) -> impl Iterator<Item = &TimeRange> {
        self.ranges.iter().filter(move |r| {
            if r.is_valid() {
                true
            } else {
                tracing::warn!(
                    schedule = %self.id,
                    start_minute = r.start_minute,
                    end_minute = r.end_minute,
                    "skipping malformed time range"
                );
                false
            }
        })
    }

    fn date_in_bounds(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start_date {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if date > end {
                return false;
            }
        }
        true
    }

    fn day_active(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.days.contains(&weekday)
    }

    /// Weekday, date-bound and exception checks for a candidate day.
    fn day_qualifies(&self, date: NaiveDate) -> bool {
        self.date_in_bounds(date) && self.day_active(date) && !self.exceptions.contains(&date)
    }
}

fn minute_of_day(instant: NaiveDateTime) -> u16 {
    (instant.hour() * 60 + instant.minute()) as u16
}

fn at_minute(date: NaiveDate, minute: u16) -> Option<NaiveDateTime> {
    let time = NaiveTime::from_hms_opt(u32::from(minute) / 60, u32::from(minute) % 60, 0)?;
    Some(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(date: (i32, u32, u32), hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(date.0, date.1, date.2)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn office_hours() -> Schedule {
        let mut s = Schedule::new("work", "Work hours", RepeatRule::Weekdays);
        s.ranges.push(TimeRange::new(9, 0, 17, 0));
        s
    }

    fn overnight() -> Schedule {
        let mut s = Schedule::new("night", "Wind down", RepeatRule::Daily);
        s.ranges.push(TimeRange::new(22, 0, 6, 0));
        s
    }

    // 2025-06-02 is a Monday; 2025-06-07 a Saturday.

    #[test]
    fn weekday_schedule_scenario() {
        let s = office_hours();
        assert!(!s.is_active_at(at((2025, 6, 7), 10, 0)), "Saturday 10:00");
        assert!(s.is_active_at(at((2025, 6, 2), 10, 0)), "Monday 10:00");
        assert!(!s.is_active_at(at((2025, 6, 2), 18, 0)), "Monday 18:00");
    }

    #[test]
    fn overnight_schedule_scenario() {
        let s = overnight();
        assert!(s.is_active_at(at((2025, 6, 2), 23, 30)));
        assert!(!s.is_active_at(at((2025, 6, 2), 7, 0)));
    }

    #[test]
    fn overnight_boundaries_are_inside() {
        let r = TimeRange::new(22, 0, 6, 0);
        assert!(r.contains(22 * 60));
        assert!(r.contains(6 * 60));
        assert!(!r.contains(12 * 60));
    }

    #[test]
    fn normal_boundaries_are_inside() {
        let r = TimeRange::new(9, 0, 17, 0);
        assert!(r.contains(9 * 60));
        assert!(r.contains(17 * 60));
        assert!(!r.contains(17 * 60 + 1));
    }

    #[test]
    fn empty_ranges_never_active() {
        let s = Schedule::new("empty", "No ranges", RepeatRule::Daily);
        for hour in 0..24 {
            assert!(!s.is_active_at(at((2025, 6, 2), hour, 0)));
        }
    }

    #[test]
    fn disabled_schedule_never_active() {
        let mut s = office_hours();
        s.enabled = false;
        assert!(!s.is_active_at(at((2025, 6, 2), 10, 0)));
        assert_eq!(s.next_start(at((2025, 6, 2), 8, 0)), None);
    }

    #[test]
    fn exception_date_suppresses() {
        let mut s = office_hours();
        s.exceptions.push(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
        assert!(!s.is_active_at(at((2025, 6, 2), 10, 0)));
        assert!(s.is_active_at(at((2025, 6, 3), 10, 0)));
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let mut s = office_hours();
        s.start_date = NaiveDate::from_ymd_opt(2025, 6, 2);
        s.end_date = NaiveDate::from_ymd_opt(2025, 6, 3);
        assert!(s.is_active_at(at((2025, 6, 2), 10, 0)));
        assert!(s.is_active_at(at((2025, 6, 3), 10, 0)));
        assert!(!s.is_active_at(at((2025, 6, 4), 10, 0)));
    }

    #[test]
    fn malformed_range_treated_as_not_active() {
        let mut s = Schedule::new("bad", "Bad range", RepeatRule::Daily);
        s.ranges.push(TimeRange {
            start_minute: 2000,
            end_minute: 2500,
        });
        assert!(!s.is_active_at(at((2025, 6, 2), 10, 0)));
        assert_eq!(s.next_start(at((2025, 6, 2), 8, 0)), None);
    }

    #[test]
    fn next_start_later_today() {
        let s = office_hours();
        assert_eq!(
            s.next_start(at((2025, 6, 2), 8, 0)),
            Some(at((2025, 6, 2), 9, 0))
        );
    }

    #[test]
    fn next_start_skips_weekend() {
        let s = office_hours();
        // Friday evening -> Monday morning.
        assert_eq!(
            s.next_start(at((2025, 6, 6), 18, 0)),
            Some(at((2025, 6, 9), 9, 0))
        );
    }

    #[test]
    fn next_start_while_inside_range_is_not_current_range() {
        let mut s = office_hours();
        s.ranges.push(TimeRange::new(19, 0, 20, 0));
        assert_eq!(
            s.next_start(at((2025, 6, 2), 10, 0)),
            Some(at((2025, 6, 2), 19, 0))
        );
    }

    #[test]
    fn next_start_none_beyond_horizon() {
        let mut s = office_hours();
        // Bound the schedule to the past.
        s.end_date = NaiveDate::from_ymd_opt(2025, 5, 1);
        assert_eq!(s.next_start(at((2025, 6, 2), 8, 0)), None);
    }

    #[test]
    fn next_end_same_day() {
        let s = office_hours();
        assert_eq!(
            s.next_end(at((2025, 6, 2), 10, 0)),
            Some(at((2025, 6, 2), 17, 0))
        );
    }

    #[test]
    fn next_end_crosses_midnight() {
        let s = overnight();
        assert_eq!(
            s.next_end(at((2025, 6, 2), 23, 30)),
            Some(at((2025, 6, 3), 6, 0))
        );
        // After midnight the end is the same day.
        assert_eq!(
            s.next_end(at((2025, 6, 3), 1, 0)),
            Some(at((2025, 6, 3), 6, 0))
        );
    }

    #[test]
    fn next_end_none_when_inactive() {
        let s = office_hours();
        assert_eq!(s.next_end(at((2025, 6, 2), 8, 0)), None);
    }

    #[test]
    fn repeat_rule_default_days() {
        assert_eq!(RepeatRule::Weekdays.default_days(), vec![1, 2, 3, 4, 5]);
        assert_eq!(RepeatRule::Weekends.default_days(), vec![0, 6]);
        assert_eq!(RepeatRule::Daily.default_days().len(), 7);
    }

    proptest! {
        #[test]
        fn schedule_without_ranges_inactive_everywhere(
            hour in 0u32..24, minute in 0u32..60, day in 1u32..28
        ) {
            let s = Schedule::new("p", "Prop", RepeatRule::Daily);
            prop_assert!(!s.is_active_at(at((2025, 6, day), hour, minute)));
        }

        #[test]
        fn overnight_containment_partition(
            start in 0u16..1440, end in 0u16..1440, minute in 0u16..1440
        ) {
            prop_assume!(start > end);
            let r = TimeRange { start_minute: start, end_minute: end };
            let inside = r.contains(minute);
            let strictly_between = minute > end && minute < start;
            prop_assert_eq!(inside, !strictly_between);
        }

        #[test]
        fn duration_matches_contained_minutes(
            start in 0u16..1440, end in 0u16..1440
        ) {
            let r = TimeRange { start_minute: start, end_minute: end };
            let counted = (0u16..1440).filter(|&m| r.contains(m)).count() as u16;
            prop_assert_eq!(counted, r.duration_minutes());
        }
    }
}
