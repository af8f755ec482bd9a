//! Day-part windows and their preferred activity categories.
//!
//! The partition and its category table are tuning constants, not business
//! rules: morning favors energizing starts, evening favors winding down.

use crate::activity::ActivityCategory;

/// Partition of the day into selection windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPart {
    /// 06:00-11:59
    Morning,
    /// 12:00-14:59
    Midday,
    /// 15:00-17:59
    Afternoon,
    /// 18:00-22:59
    Evening,
    /// 23:00-05:59
    Night,
}

impl DayPart {
    /// Classify an hour of day (0-23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => DayPart::Morning,
            12..=14 => DayPart::Midday,
            15..=17 => DayPart::Afternoon,
            18..=22 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    /// Categories preferred in this window.
    pub fn preferred_categories(&self) -> &'static [ActivityCategory] {
        match self {
            DayPart::Morning => &[ActivityCategory::Breathing, ActivityCategory::Movement],
            DayPart::Midday => &[ActivityCategory::QuickBreak, ActivityCategory::Movement],
            DayPart::Afternoon => &[ActivityCategory::Movement, ActivityCategory::Mindfulness],
            DayPart::Evening => &[ActivityCategory::Reflection, ActivityCategory::Mindfulness],
            DayPart::Night => &[ActivityCategory::Breathing, ActivityCategory::Mindfulness],
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Midday => "midday",
            DayPart::Afternoon => "afternoon",
            DayPart::Evening => "evening",
            DayPart::Night => "night",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hour_partition_covers_the_day() {
        assert_eq!(DayPart::from_hour(6), DayPart::Morning);
        assert_eq!(DayPart::from_hour(11), DayPart::Morning);
        assert_eq!(DayPart::from_hour(12), DayPart::Midday);
        assert_eq!(DayPart::from_hour(14), DayPart::Midday);
        assert_eq!(DayPart::from_hour(15), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(17), DayPart::Afternoon);
        assert_eq!(DayPart::from_hour(18), DayPart::Evening);
        assert_eq!(DayPart::from_hour(22), DayPart::Evening);
        assert_eq!(DayPart::from_hour(23), DayPart::Night);
        assert_eq!(DayPart::from_hour(3), DayPart::Night);
    }

    #[test]
    fn every_window_has_preferred_categories() {
        for hour in 0..24 {
            assert!(!DayPart::from_hour(hour).preferred_categories().is_empty());
        }
    }
}
