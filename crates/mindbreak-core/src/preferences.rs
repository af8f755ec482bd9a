//! Per-user selection preferences.
//!
//! Serialized to/from TOML at `~/.config/mindbreak/preferences.toml` by the
//! storage layer. Override maps take precedence over category preference,
//! which takes precedence over the full-catalog fallback.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::activity::{ActivityCategory, ActivityId};
use crate::error::ValidationError;

/// Lowest accepted `max_daily` value.
pub const MIN_MAX_DAILY: u32 = 1;
/// Highest accepted `max_daily` value.
pub const MAX_MAX_DAILY: u32 = 100;

/// An hour-of-day override: within `start_hour..=end_hour`, prefer the
/// listed activities over the fixed day-part windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourOverride {
    /// First hour covered (0-23).
    pub start_hour: u8,
    /// Last hour covered, inclusive (0-23).
    pub end_hour: u8,
    /// Activities preferred inside this hour range.
    pub activities: Vec<ActivityId>,
}

impl HourOverride {
    /// Whether `hour` falls inside this override.
    pub fn covers(&self, hour: u8) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

/// Per-user selection tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Ordered list of preferred categories.
    #[serde(default = "default_preferred_categories")]
    pub preferred_categories: Vec<ActivityCategory>,
    /// Suppress recently used activities.
    #[serde(default = "default_true")]
    pub variety_enabled: bool,
    /// Per-app activity overrides, keyed by app bundle identifier.
    #[serde(default)]
    pub app_overrides: HashMap<String, Vec<ActivityId>>,
    /// Per-category activity overrides, keyed by app category identifier.
    #[serde(default)]
    pub category_overrides: HashMap<String, Vec<ActivityId>>,
    /// Hour-range overrides, checked before the fixed day-part windows.
    #[serde(default)]
    pub hour_overrides: Vec<HourOverride>,
    /// Maximum intention activities per day (advisory).
    #[serde(default = "default_max_daily")]
    pub max_daily: u32,
    /// History-driven smart selection. When off, selection is a uniform
    /// pick from the sourced candidates.
    #[serde(default = "default_true")]
    pub smart_selection: bool,
}

fn default_preferred_categories() -> Vec<ActivityCategory> {
    ActivityCategory::all().to_vec()
}

fn default_true() -> bool {
    true
}

fn default_max_daily() -> u32 {
    10
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_categories: default_preferred_categories(),
            variety_enabled: true,
            app_overrides: HashMap::new(),
            category_overrides: HashMap::new(),
            hour_overrides: Vec::new(),
            max_daily: default_max_daily(),
            smart_selection: true,
        }
    }
}

impl Preferences {
    /// Validate edited preferences before saving.
    ///
    /// # Errors
    /// `NoPreferredTypes` when smart selection is on with no preferred
    /// categories; `InvalidMaxDaily` when `max_daily` is out of range.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.smart_selection && self.preferred_categories.is_empty() {
            return Err(ValidationError::NoPreferredTypes);
        }
        if self.max_daily < MIN_MAX_DAILY || self.max_daily > MAX_MAX_DAILY {
            return Err(ValidationError::InvalidMaxDaily {
                value: self.max_daily,
                min: MIN_MAX_DAILY,
                max: MAX_MAX_DAILY,
            });
        }
        Ok(())
    }

    /// Activity override list for a context id, app map first.
    pub fn override_for(&self, context_id: &str) -> Option<&[ActivityId]> {
        self.app_overrides
            .get(context_id)
            .or_else(|| self.category_overrides.get(context_id))
            .map(Vec::as_slice)
            .filter(|ids| !ids.is_empty())
    }

    /// The first hour override covering `hour` with a non-empty list.
    pub fn hour_override_for(&self, hour: u8) -> Option<&HourOverride> {
        self.hour_overrides
            .iter()
            .find(|o| o.covers(hour) && !o.activities.is_empty())
    }
}
