//! Micro goal model - a granular task contributing to one macro goal.

use serde::{Deserialize, Serialize};
use crate::error::{check_completion, check_hours, check_name, ValidationResult};
use crate::id::{MacroGoalId, MicroGoalId};
use crate::Time;

/// A micro goal belongs to exactly one macro goal.
///
/// The parent link is a plain reference; removing children when the parent
/// goes away is the goal manager's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroGoal {
    /// Unique identifier
    pub id: MicroGoalId,

    /// Owning macro goal
    pub macro_goal_id: MacroGoalId,

    /// Display name
    pub name: String,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub completion: f64,

    /// Accumulated hours worked
    #[serde(default)]
    pub hours: f64,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// Input for creating a micro goal.
#[derive(Debug, Clone)]
pub struct NewMicroGoal {
    /// Owning macro goal
    pub macro_goal_id: MacroGoalId,
    /// Display name
    pub name: String,
    /// Starting completion, zero if absent
    pub completion: Option<f64>,
    /// Starting hours, zero if absent
    pub hours: Option<f64>,
}

impl NewMicroGoal {
    /// A fresh micro goal with no progress.
    pub fn named(macro_goal_id: MacroGoalId, name: impl Into<String>) -> Self {
        Self {
            macro_goal_id,
            name: name.into(),
            completion: None,
            hours: None,
        }
    }
}

/// Partial update of a micro goal. The parent cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct MicroGoalPatch {
    /// New name
    pub name: Option<String>,
    /// New completion
    pub completion: Option<f64>,
    /// New hours
    pub hours: Option<f64>,
}

impl MicroGoal {
    /// Build a micro goal; missing progress fields start at zero.
    pub fn new(spec: NewMicroGoal) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: MicroGoalId::new(),
            macro_goal_id: spec.macro_goal_id,
            name: spec.name,
            completion: spec.completion.unwrap_or(0.0),
            hours: spec.hours.unwrap_or(0.0),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this item is marked fully complete.
    pub fn is_complete(&self) -> bool {
        self.completion >= 100.0
    }

    /// Check field constraints.
    pub fn validate(&self) -> ValidationResult {
        check_name(&self.name)?;
        check_completion(self.completion)?;
        check_hours(self.hours)?;
        Ok(())
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: MicroGoalPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(completion) = patch.completion {
            self.completion = completion;
        }
        if let Some(hours) = patch.hours {
            self.hours = hours;
        }
        self.updated_at = chrono::Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    #[test]
    fn test_new_defaults_to_zero_progress() {
        let micro = MicroGoal::new(NewMicroGoal::named(MacroGoalId::new(), "Scales"));
        assert_eq!(micro.completion, 0.0);
        assert_eq!(micro.hours, 0.0);
        assert!(!micro.is_complete());
        assert!(micro.validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let mut micro = MicroGoal::new(NewMicroGoal::named(MacroGoalId::new(), "Scales"));

        micro.completion = 100.5;
        assert_eq!(micro.validate(), Err(ValidationError::CompletionOutOfRange(100.5)));

        micro.completion = 100.0;
        micro.hours = -1.0;
        assert_eq!(micro.validate(), Err(ValidationError::NegativeHours(-1.0)));

        micro.hours = 0.0;
        micro.completion = f64::NAN;
        assert!(micro.validate().is_err());
    }

    #[test]
    fn test_patch_keeps_parent() {
        let parent = MacroGoalId::new();
        let mut micro = MicroGoal::new(NewMicroGoal::named(parent, "Scales"));
        micro.apply(MicroGoalPatch {
            completion: Some(40.0),
            ..Default::default()
        });
        assert_eq!(micro.macro_goal_id, parent);
        assert_eq!(micro.completion, 40.0);
        assert_eq!(micro.name, "Scales");
    }

    #[test]
    fn test_deserialize_fills_missing_progress() {
        let json = serde_json::json!({
            "id": MicroGoalId::new().to_string(),
            "macroGoalId": MacroGoalId::new().to_string(),
            "name": "Read chapter 1",
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        });
        let micro: MicroGoal = serde_json::from_value(json).unwrap();
        assert_eq!(micro.completion, 0.0);
        assert_eq!(micro.hours, 0.0);
    }
}
