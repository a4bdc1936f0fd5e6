//! Storage trait abstraction.

use async_trait::async_trait;
use goalboard_core::{MacroGoal, MacroGoalId, MicroGoal, MicroGoalId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage abstraction for goal records.
///
/// Listings carry no ordering guarantee beyond what each method documents;
/// the progress calculator does not depend on order.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Macro goal operations ===

    /// Save a macro goal (create or update).
    async fn save_macro_goal(&mut self, goal: &MacroGoal) -> Result<()>;

    /// Load a macro goal by ID.
    async fn load_macro_goal(&self, id: MacroGoalId) -> Result<Option<MacroGoal>>;

    /// List all macro goals, newest first.
    async fn list_macro_goals(&self) -> Result<Vec<MacroGoal>>;

    /// Delete a macro goal. Its micro goals are left alone.
    async fn delete_macro_goal(&mut self, id: MacroGoalId) -> Result<()>;

    // === Micro goal operations ===

    /// Save a micro goal (create or update).
    async fn save_micro_goal(&mut self, goal: &MicroGoal) -> Result<()>;

    /// Load a micro goal by ID.
    async fn load_micro_goal(&self, id: MicroGoalId) -> Result<Option<MicroGoal>>;

    /// List all micro goals, newest first.
    async fn list_micro_goals(&self) -> Result<Vec<MicroGoal>>;

    /// List the micro goals of one macro goal, newest first.
    async fn list_micro_goals_for(&self, macro_id: MacroGoalId) -> Result<Vec<MicroGoal>> {
        let all = self.list_micro_goals().await?;
        Ok(all
            .into_iter()
            .filter(|m| m.macro_goal_id == macro_id)
            .collect())
    }

    /// Delete a micro goal.
    async fn delete_micro_goal(&mut self, id: MicroGoalId) -> Result<()>;

    // === Transaction support ===

    /// Commit pending changes with a message.
    async fn commit(&mut self, message: &str) -> Result<()>;

    /// Rollback pending changes.
    async fn rollback(&mut self) -> Result<()>;
}
