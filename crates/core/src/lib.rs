//! Goalboard core data models.
//!
//! Macro goals, the micro goals that feed them, and the field constraints
//! both must satisfy before they are stored.

#![warn(missing_docs)]

// Core identities
mod id;

// Goals
mod goal;
mod micro_goal;

// Validation
mod error;

// Re-exports
pub use id::*;

pub use goal::{GoalType, MacroGoal, MacroGoalPatch, NewMacroGoal};
pub use micro_goal::{MicroGoal, MicroGoalPatch, NewMicroGoal};
pub use error::{ValidationError, ValidationResult};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
