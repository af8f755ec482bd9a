//! Activity model: the atomic mindful-break interventions the engine selects.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Unique identifier for an activity.
pub type ActivityId = String;

/// Minimum accepted activity duration in seconds.
pub const MIN_DURATION_SECS: u32 = 1;
/// Maximum accepted activity duration in seconds.
pub const MAX_DURATION_SECS: u32 = 3600;

/// Activity category classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityCategory {
    Breathing,
    Mindfulness,
    Reflection,
    Movement,
    QuickBreak,
}

impl ActivityCategory {
    /// All categories, in default preference order.
    pub fn all() -> [ActivityCategory; 5] {
        [
            ActivityCategory::Breathing,
            ActivityCategory::Mindfulness,
            ActivityCategory::Reflection,
            ActivityCategory::Movement,
            ActivityCategory::QuickBreak,
        ]
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            ActivityCategory::Breathing => "breathing",
            ActivityCategory::Mindfulness => "mindfulness",
            ActivityCategory::Reflection => "reflection",
            ActivityCategory::Movement => "movement",
            ActivityCategory::QuickBreak => "quick-break",
        }
    }

    /// Parse from a display name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "breathing" => Some(ActivityCategory::Breathing),
            "mindfulness" => Some(ActivityCategory::Mindfulness),
            "reflection" => Some(ActivityCategory::Reflection),
            "movement" => Some(ActivityCategory::Movement),
            "quick-break" => Some(ActivityCategory::QuickBreak),
            _ => None,
        }
    }
}

/// Category-specific content payload.
///
/// Opaque to the selection engine; only the presentation layer interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ActivityContent {
    /// Paced breathing pattern, all phases in seconds
    Breathing {
        inhale_secs: u32,
        hold_secs: u32,
        exhale_secs: u32,
        cycles: u32,
    },
    /// Step-by-step guided exercise
    Guided { steps: Vec<String> },
    /// Free-form journaling prompt
    Prompt { text: String },
    /// Physical movement instructions
    Movement { instructions: Vec<String> },
    /// Plain message shown for the duration of the break
    Message { text: String },
}

/// A single mindful-break intervention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier across the full catalog (built-in and custom).
    pub id: ActivityId,
    /// Display title.
    pub title: String,
    /// Category classification.
    pub category: ActivityCategory,
    /// Nominal duration in seconds.
    pub duration_secs: u32,
    /// Category-specific content payload.
    pub content: ActivityContent,
    /// Free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Whether this activity is user-authored rather than built-in.
    #[serde(default)]
    pub custom: bool,
}

impl Activity {
    /// Validate the activity's duration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.duration_secs < MIN_DURATION_SECS || self.duration_secs > MAX_DURATION_SECS {
            return Err(ValidationError::InvalidDuration {
                seconds: self.duration_secs,
                min: MIN_DURATION_SECS,
                max: MAX_DURATION_SECS,
            });
        }
        Ok(())
    }

    /// Nominal duration in whole minutes, rounded up.
    pub fn duration_minutes(&self) -> u32 {
        self.duration_secs.div_ceil(60)
    }
}
