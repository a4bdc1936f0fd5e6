//! Macro goal model - top-level objective tracked by percentage or hours.

use serde::{Deserialize, Serialize};
use crate::error::{check_name, ValidationError, ValidationResult};
use crate::id::MacroGoalId;
use crate::Time;

/// A macro goal is a high-level objective broken down into micro goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroGoal {
    /// Unique identifier
    pub id: MacroGoalId,

    /// Display name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// How progress is measured
    #[serde(rename = "type")]
    pub goal_type: GoalType,

    /// Target hours, only meaningful for [`GoalType::Hours`]
    #[serde(default)]
    pub total_hours: Option<f64>,

    /// Display icon (usually an emoji)
    #[serde(default)]
    pub icon: Option<String>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

/// How a macro goal measures progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    /// Mean of micro goal completion percentages
    #[default]
    Percentage,
    /// Accumulated micro goal hours against a target
    Hours,
}

impl GoalType {
    /// Lowercase tag used in storage and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Percentage => "percentage",
            GoalType::Hours => "hours",
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GoalType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "percentage" | "percent" | "%" => Ok(GoalType::Percentage),
            "hours" | "hour" | "h" => Ok(GoalType::Hours),
            other => Err(ValidationError::UnknownGoalType(other.to_string())),
        }
    }
}

/// Input for creating a macro goal.
#[derive(Debug, Clone, Default)]
pub struct NewMacroGoal {
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Tracking type
    pub goal_type: GoalType,
    /// Target hours; ignored for percentage goals
    pub total_hours: Option<f64>,
    /// Display icon
    pub icon: Option<String>,
}

/// Partial update of a macro goal. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct MacroGoalPatch {
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New tracking type
    pub goal_type: Option<GoalType>,
    /// New target hours
    pub total_hours: Option<f64>,
    /// New icon; empty clears it
    pub icon: Option<String>,
}

impl MacroGoalPatch {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.goal_type.is_none()
            && self.total_hours.is_none()
            && self.icon.is_none()
    }
}

impl MacroGoal {
    /// Build a macro goal from creation input.
    ///
    /// Percentage goals never carry a target, so `total_hours` is dropped
    /// for them.
    pub fn new(spec: NewMacroGoal) -> Self {
        let now = chrono::Utc::now();
        let total_hours = match spec.goal_type {
            GoalType::Hours => spec.total_hours,
            GoalType::Percentage => None,
        };

        Self {
            id: MacroGoalId::new(),
            name: spec.name,
            description: spec.description.unwrap_or_default(),
            goal_type: spec.goal_type,
            total_hours,
            icon: spec.icon.filter(|i| !i.is_empty()),
            created_at: now,
            updated_at: now,
        }
    }

    /// Target hours as used by the calculator: absent means zero.
    pub fn target_hours(&self) -> f64 {
        self.total_hours.unwrap_or(0.0)
    }

    /// Check field constraints.
    pub fn validate(&self) -> ValidationResult {
        check_name(&self.name)?;

        if self.goal_type == GoalType::Hours {
            match self.total_hours {
                None => return Err(ValidationError::MissingTotalHours),
                Some(t) if !t.is_finite() || t <= 0.0 => {
                    return Err(ValidationError::InvalidTotalHours(t));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: MacroGoalPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(goal_type) = patch.goal_type {
            self.goal_type = goal_type;
        }
        if let Some(total_hours) = patch.total_hours {
            self.total_hours = Some(total_hours);
        }
        if let Some(icon) = patch.icon {
            self.icon = Some(icon).filter(|i| !i.is_empty());
        }
        if self.goal_type == GoalType::Percentage {
            self.total_hours = None;
        }
        self.updated_at = chrono::Utc::now();
    }
}
