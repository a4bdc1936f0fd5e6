//! Goal management errors.

use goalboard_core::{MacroGoalId, MicroGoalId, ValidationError};
use goalboard_storage::StorageError;

/// Result type for goal management.
pub type Result<T> = std::result::Result<T, GoalError>;

/// Errors raised by the goal manager.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    /// No macro goal with this ID
    #[error("Macro goal not found: {0}")]
    MacroGoalNotFound(MacroGoalId),

    /// No micro goal with this ID
    #[error("Micro goal not found: {0}")]
    MicroGoalNotFound(MicroGoalId),

    /// Record failed validation
    #[error("Invalid goal: {0}")]
    Invalid(#[from] ValidationError),

    /// Storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
