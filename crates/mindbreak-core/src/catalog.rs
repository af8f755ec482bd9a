//! Activity catalog: built-in interventions plus user-authored customs.
//!
//! Built-ins are fixed at process start. Custom activities are created and
//! removed by the library manager through [`Catalog`], which enforces id
//! uniqueness across the full set; the selection engine only ever reads.

use crate::activity::{Activity, ActivityCategory, ActivityContent, ActivityId};
use crate::error::ValidationError;

/// The full activity catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    activities: Vec<Activity>,
}

impl Catalog {
    /// Catalog containing only the built-in activities.
    pub fn builtin() -> Self {
        Self {
            activities: builtin_activities(),
        }
    }

    /// Catalog with the built-ins plus previously stored custom activities.
    ///
    /// # Errors
    /// Returns `DuplicateActivity` if a custom id collides with any other
    /// id, or `InvalidDuration` if a custom activity fails validation.
    pub fn with_customs(customs: Vec<Activity>) -> Result<Self, ValidationError> {
        let mut catalog = Self::builtin();
        for activity in customs {
            catalog.add_custom(activity)?;
        }
        Ok(catalog)
    }

    /// All activities, built-in first.
    pub fn all(&self) -> &[Activity] {
        &self.activities
    }

    /// Look up an activity by id.
    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// All activities in a category.
    pub fn by_category(&self, category: ActivityCategory) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.category == category)
            .collect()
    }

    /// Register a user-authored activity.
    ///
    /// # Errors
    /// Returns `DuplicateActivity` when the id is already taken, or the
    /// activity's own validation error.
    pub fn add_custom(&mut self, mut activity: Activity) -> Result<(), ValidationError> {
        activity.validate()?;
        if self.get(&activity.id).is_some() {
            return Err(ValidationError::DuplicateActivity(activity.id));
        }
        activity.custom = true;
        self.activities.push(activity);
        Ok(())
    }

    /// Remove a custom activity by id. Built-ins cannot be removed.
    ///
    /// Returns true if an activity was removed.
    pub fn remove_custom(&mut self, id: &str) -> bool {
        let before = self.activities.len();
        self.activities.retain(|a| !(a.custom && a.id == id));
        self.activities.len() != before
    }

    /// The custom subset, for persistence.
    pub fn customs(&self) -> Vec<&Activity> {
        self.activities.iter().filter(|a| a.custom).collect()
    }

    /// Number of activities in the catalog.
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Built-in activity ids, for listing.
pub fn builtin_ids() -> Vec<&'static str> {
    vec![
        "box-breathing",
        "478-breathing",
        "coherent-breathing",
        "body-scan",
        "five-senses",
        "gratitude-pause",
        "intention-check",
        "neck-release",
        "desk-stretch",
        "short-walk",
        "water-break",
        "look-away",
    ]
}

// ============================================================================
// BUILT-IN ACTIVITIES
// ============================================================================

/// Returns the full built-in activity table.
pub fn builtin_activities() -> Vec<Activity> {
    vec![
        box_breathing(),
        four_seven_eight(),
        coherent_breathing(),
        body_scan(),
        five_senses(),
        gratitude_pause(),
        intention_check(),
        neck_release(),
        desk_stretch(),
        short_walk(),
        water_break(),
        look_away(),
    ]
}

fn box_breathing() -> Activity {
    Activity {
        id: "box-breathing".to_string(),
        title: "Box Breathing".to_string(),
        category: ActivityCategory::Breathing,
        duration_secs: 120,
        content: ActivityContent::Breathing {
            inhale_secs: 4,
            hold_secs: 4,
            exhale_secs: 4,
            cycles: 6,
        },
        tags: vec!["calm".to_string(), "focus".to_string()],
        custom: false,
    }
}

fn four_seven_eight() -> Activity {
    Activity {
        id: "478-breathing".to_string(),
        title: "4-7-8 Breathing".to_string(),
        category: ActivityCategory::Breathing,
        duration_secs: 90,
        content: ActivityContent::Breathing {
            inhale_secs: 4,
            hold_secs: 7,
            exhale_secs: 8,
            cycles: 4,
        },
        tags: vec!["calm".to_string(), "sleep".to_string()],
        custom: false,
    }
}

fn coherent_breathing() -> Activity {
    Activity {
        id: "coherent-breathing".to_string(),
        title: "Coherent Breathing".to_string(),
        category: ActivityCategory::Breathing,
        duration_secs: 180,
        content: ActivityContent::Breathing {
            inhale_secs: 5,
            hold_secs: 0,
            exhale_secs: 5,
            cycles: 18,
        },
        tags: vec!["steady".to_string()],
        custom: false,
    }
}

fn body_scan() -> Activity {
    Activity {
        id: "body-scan".to_string(),
        title: "One-Minute Body Scan".to_string(),
        category: ActivityCategory::Mindfulness,
        duration_secs: 60,
        content: ActivityContent::Guided {
            steps: vec![
                "Close your eyes and settle into your seat".to_string(),
                "Notice the weight of your feet on the floor".to_string(),
                "Move your attention slowly up through your legs and back".to_string(),
                "Relax your shoulders, jaw, and forehead".to_string(),
                "Take one deep breath and open your eyes".to_string(),
            ],
        },
        tags: vec!["grounding".to_string()],
        custom: false,
    }
}

fn five_senses() -> Activity {
    Activity {
        id: "five-senses".to_string(),
        title: "Five Senses Check-In".to_string(),
        category: ActivityCategory::Mindfulness,
        duration_secs: 90,
        content: ActivityContent::Guided {
            steps: vec![
                "Name five things you can see".to_string(),
                "Name four things you can feel".to_string(),
                "Name three things you can hear".to_string(),
                "Name two things you can smell".to_string(),
                "Name one thing you can taste".to_string(),
            ],
        },
        tags: vec!["grounding".to_string(), "anxiety".to_string()],
        custom: false,
    }
}

fn gratitude_pause() -> Activity {
    Activity {
        id: "gratitude-pause".to_string(),
        title: "Gratitude Pause".to_string(),
        category: ActivityCategory::Reflection,
        duration_secs: 60,
        content: ActivityContent::Prompt {
            text: indoc::indoc! {"
                Think of one thing that went well today, however small.
                Who or what made it possible? Hold it in mind for a few
                breaths before you move on.
            "}
            .to_string(),
        },
        tags: vec!["gratitude".to_string()],
        custom: false,
    }
}

fn intention_check() -> Activity {
    Activity {
        id: "intention-check".to_string(),
        title: "Intention Check".to_string(),
        category: ActivityCategory::Reflection,
        duration_secs: 45,
        content: ActivityContent::Prompt {
            text: indoc::indoc! {"
                What were you about to open this app for? If you still
                want to, go ahead deliberately. If not, what would serve
                you better right now?
            "}
            .to_string(),
        },
        tags: vec!["intention".to_string()],
        custom: false,
    }
}

fn neck_release() -> Activity {
    Activity {
        id: "neck-release".to_string(),
        title: "Neck Release".to_string(),
        category: ActivityCategory::Movement,
        duration_secs: 60,
        content: ActivityContent::Movement {
            instructions: vec![
                "Drop your chin to your chest and hold for ten seconds".to_string(),
                "Tilt your head toward each shoulder, ten seconds per side".to_string(),
                "Roll your shoulders backward five times".to_string(),
            ],
        },
        tags: vec!["desk".to_string(), "tension".to_string()],
        custom: false,
    }
}

fn desk_stretch() -> Activity {
    Activity {
        id: "desk-stretch".to_string(),
        title: "Desk Stretch".to_string(),
        category: ActivityCategory::Movement,
        duration_secs: 90,
        content: ActivityContent::Movement {
            instructions: vec![
                "Stand and reach both arms overhead".to_string(),
                "Side-bend left and right, five breaths each".to_string(),
                "Fold forward and let your arms hang".to_string(),
                "Roll up slowly to standing".to_string(),
            ],
        },
        tags: vec!["desk".to_string()],
        custom: false,
    }
}

fn short_walk() -> Activity {
    Activity {
        id: "short-walk".to_string(),
        title: "Two-Minute Walk".to_string(),
        category: ActivityCategory::Movement,
        duration_secs: 120,
        content: ActivityContent::Message {
            text: "Step away from the screen and walk, even just around the room."
                .to_string(),
        },
        tags: vec!["energy".to_string()],
        custom: false,
    }
}

fn water_break() -> Activity {
    Activity {
        id: "water-break".to_string(),
        title: "Water Break".to_string(),
        category: ActivityCategory::QuickBreak,
        duration_secs: 30,
        content: ActivityContent::Message {
            text: "Get a glass of water and drink it slowly before returning.".to_string(),
        },
        tags: vec!["hydration".to_string()],
        custom: false,
    }
}

fn look_away() -> Activity {
    Activity {
        id: "look-away".to_string(),
        title: "20-20-20 Look Away".to_string(),
        category: ActivityCategory::QuickBreak,
        duration_secs: 20,
        content: ActivityContent::Message {
            text: "Look at something at least 20 feet away for 20 seconds.".to_string(),
        },
        tags: vec!["eyes".to_string()],
        custom: false,
    }
}
