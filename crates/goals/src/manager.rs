//! Goal management service.

use async_trait::async_trait;
use goalboard_core::{
    GoalType, MacroGoal, MacroGoalId, MacroGoalPatch, MicroGoal, MicroGoalId, MicroGoalPatch,
    NewMacroGoal, NewMicroGoal, ValidationError,
};
use goalboard_storage::Storage;
use tracing::{debug, info};

use crate::error::{GoalError, Result};

/// Goal management service.
///
/// Every mutation validates the record, writes it and commits.
#[async_trait]
pub trait GoalManager: Send + Sync {
    /// Create a macro goal.
    async fn create_macro_goal(&mut self, spec: NewMacroGoal) -> Result<MacroGoal>;

    /// Update fields of a macro goal.
    async fn update_macro_goal(
        &mut self,
        id: MacroGoalId,
        patch: MacroGoalPatch,
    ) -> Result<MacroGoal>;

    /// Delete a macro goal and all of its micro goals. Returns how many
    /// micro goals went with it.
    async fn delete_macro_goal(&mut self, id: MacroGoalId) -> Result<usize>;

    /// Create a micro goal under an existing macro goal.
    async fn create_micro_goal(&mut self, spec: NewMicroGoal) -> Result<MicroGoal>;

    /// Update fields of a micro goal.
    async fn update_micro_goal(
        &mut self,
        id: MicroGoalId,
        patch: MicroGoalPatch,
    ) -> Result<MicroGoal>;

    /// Delete a micro goal.
    async fn delete_micro_goal(&mut self, id: MicroGoalId) -> Result<()>;

    /// Mark a micro goal fully done or reset it.
    async fn toggle_micro_goal(&mut self, id: MicroGoalId, done: bool) -> Result<MicroGoal>;

    /// Add worked hours to a micro goal.
    async fn log_hours(&mut self, id: MicroGoalId, hours: f64) -> Result<MicroGoal>;

    /// Replace the worked hours of a micro goal.
    async fn set_hours(&mut self, id: MicroGoalId, hours: f64) -> Result<MicroGoal>;

    /// Replace the completion percentage of a micro goal.
    async fn set_completion(&mut self, id: MicroGoalId, completion: f64) -> Result<MicroGoal>;

    /// Look up one macro goal.
    async fn macro_goal(&self, id: MacroGoalId) -> Result<MacroGoal>;

    /// All macro goals, newest first.
    async fn macro_goals(&self) -> Result<Vec<MacroGoal>>;

    /// All micro goals, newest first.
    async fn micro_goals(&self) -> Result<Vec<MicroGoal>>;

    /// Micro goals of one macro goal, unfinished items first.
    async fn micro_goals_for(&self, id: MacroGoalId) -> Result<Vec<MicroGoal>>;
}

/// Configuration for the goal manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Cap micro goal hours at the parent's target when editing
    pub clamp_hours_to_target: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            clamp_hours_to_target: true,
        }
    }
}

/// Basic goal manager implementation.
pub struct BasicGoalManager<S: Storage> {
    storage: S,
    config: ManagerConfig,
}

impl<S: Storage> BasicGoalManager<S> {
    /// Create a new goal manager.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: ManagerConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the storage back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    async fn require_macro(&self, id: MacroGoalId) -> Result<MacroGoal> {
        self.storage
            .load_macro_goal(id)
            .await?
            .ok_or(GoalError::MacroGoalNotFound(id))
    }

    async fn require_micro(&self, id: MicroGoalId) -> Result<MicroGoal> {
        self.storage
            .load_micro_goal(id)
            .await?
            .ok_or(GoalError::MicroGoalNotFound(id))
    }

    /// Upper bound on hours for children of `parent`, if one applies.
    fn hours_cap(&self, parent: &MacroGoal) -> Option<f64> {
        if !self.config.clamp_hours_to_target || parent.goal_type != GoalType::Hours {
            return None;
        }
        Some(parent.target_hours()).filter(|t| *t > 0.0)
    }

    fn cap_hours(&self, parent: &MacroGoal, hours: f64) -> f64 {
        match self.hours_cap(parent) {
            Some(cap) if hours > cap => {
                debug!(hours, cap, "Clamping hours to target");
                cap
            }
            _ => hours,
        }
    }

    fn check_hours_arg(hours: f64) -> Result<()> {
        if !hours.is_finite() {
            return Err(ValidationError::NegativeHours(hours).into());
        }
        Ok(())
    }

    async fn store_micro(&mut self, micro: &MicroGoal, message: &str) -> Result<()> {
        micro.validate()?;
        self.storage.save_micro_goal(micro).await?;
        self.storage.commit(message).await?;
        Ok(())
    }

    async fn edit_micro(
        &mut self,
        id: MicroGoalId,
        message: &str,
        edit: impl FnOnce(&Self, &MacroGoal, &mut MicroGoal) + Send,
    ) -> Result<MicroGoal> {
        let mut micro = self.require_micro(id).await?;
        let parent = self.require_macro(micro.macro_goal_id).await?;
        edit(self, &parent, &mut micro);
        micro.updated_at = chrono::Utc::now();
        self.store_micro(&micro, message).await?;
        Ok(micro)
    }
}

#[async_trait]
impl<S: Storage + 'static> GoalManager for BasicGoalManager<S> {
    async fn create_macro_goal(&mut self, spec: NewMacroGoal) -> Result<MacroGoal> {
        let goal = MacroGoal::new(spec);
        goal.validate()?;

        self.storage.save_macro_goal(&goal).await?;
        self.storage.commit(&format!("Create macro goal {}", goal.name)).await?;

        info!(id = %goal.id, name = %goal.name, goal_type = %goal.goal_type, "Created macro goal");
        Ok(goal)
    }

    async fn update_macro_goal(
        &mut self,
        id: MacroGoalId,
        patch: MacroGoalPatch,
    ) -> Result<MacroGoal> {
        let mut goal = self.require_macro(id).await?;
        if patch.is_empty() {
            return Ok(goal);
        }

        goal.apply(patch);
        goal.validate()?;

        self.storage.save_macro_goal(&goal).await?;
        self.storage.commit(&format!("Update macro goal {}", goal.name)).await?;

        info!(id = %goal.id, "Updated macro goal");
        Ok(goal)
    }

    async fn delete_macro_goal(&mut self, id: MacroGoalId) -> Result<usize> {
        let goal = self.require_macro(id).await?;

        // Children first, so a failure never leaves orphans behind.
        let children = self.storage.list_micro_goals_for(id).await?;
        for child in &children {
            self.storage.delete_micro_goal(child.id).await?;
        }
        self.storage.delete_macro_goal(id).await?;
        self.storage.commit(&format!("Delete macro goal {}", goal.name)).await?;

        info!(id = %id, removed_micro_goals = children.len(), "Deleted macro goal");
        Ok(children.len())
    }

    async fn create_micro_goal(&mut self, spec: NewMicroGoal) -> Result<MicroGoal> {
        let parent = self.require_macro(spec.macro_goal_id).await?;

        let mut micro = MicroGoal::new(spec);
        micro.hours = self.cap_hours(&parent, micro.hours);
        self.store_micro(&micro, &format!("Create micro goal {}", micro.name)).await?;

        info!(id = %micro.id, parent = %parent.id, name = %micro.name, "Created micro goal");
        Ok(micro)
    }

    async fn update_micro_goal(
        &mut self,
        id: MicroGoalId,
        patch: MicroGoalPatch,
    ) -> Result<MicroGoal> {
        let mut micro = self.require_micro(id).await?;
        let parent = self.require_macro(micro.macro_goal_id).await?;

        micro.apply(patch);
        micro.hours = self.cap_hours(&parent, micro.hours);
        self.store_micro(&micro, &format!("Update micro goal {}", micro.name)).await?;

        info!(id = %micro.id, "Updated micro goal");
        Ok(micro)
    }

    async fn delete_micro_goal(&mut self, id: MicroGoalId) -> Result<()> {
        let micro = self.require_micro(id).await?;
        self.storage.delete_micro_goal(id).await?;
        self.storage.commit(&format!("Delete micro goal {}", micro.name)).await?;

        info!(id = %id, "Deleted micro goal");
        Ok(())
    }

    async fn toggle_micro_goal(&mut self, id: MicroGoalId, done: bool) -> Result<MicroGoal> {
        let micro = self
            .edit_micro(id, "Toggle micro goal", |_, parent, micro| {
                micro.completion = if done { 100.0 } else { 0.0 };
                if parent.goal_type == GoalType::Hours {
                    micro.hours = if done { parent.target_hours().max(0.0) } else { 0.0 };
                }
            })
            .await?;

        info!(id = %id, done, "Toggled micro goal");
        Ok(micro)
    }

    async fn log_hours(&mut self, id: MicroGoalId, hours: f64) -> Result<MicroGoal> {
        Self::check_hours_arg(hours)?;
        let micro = self
            .edit_micro(id, "Log hours", |this, parent, micro| {
                let total = (micro.hours + hours).max(0.0);
                micro.hours = this.cap_hours(parent, total);
            })
            .await?;

        info!(id = %id, logged = hours, total = micro.hours, "Logged hours");
        Ok(micro)
    }

    async fn set_hours(&mut self, id: MicroGoalId, hours: f64) -> Result<MicroGoal> {
        Self::check_hours_arg(hours)?;
        let micro = self
            .edit_micro(id, "Set hours", |this, parent, micro| {
                micro.hours = this.cap_hours(parent, hours.max(0.0));
            })
            .await?;

        info!(id = %id, hours = micro.hours, "Set hours");
        Ok(micro)
    }

    async fn set_completion(&mut self, id: MicroGoalId, completion: f64) -> Result<MicroGoal> {
        let micro = self
            .edit_micro(id, "Set completion", |_, _, micro| {
                micro.completion = completion.clamp(0.0, 100.0);
            })
            .await?;

        info!(id = %id, completion = micro.completion, "Set completion");
        Ok(micro)
    }

    async fn macro_goal(&self, id: MacroGoalId) -> Result<MacroGoal> {
        self.require_macro(id).await
    }

    async fn macro_goals(&self) -> Result<Vec<MacroGoal>> {
        Ok(self.storage.list_macro_goals().await?)
    }

    async fn micro_goals(&self) -> Result<Vec<MicroGoal>> {
        Ok(self.storage.list_micro_goals().await?)
    }

    async fn micro_goals_for(&self, id: MacroGoalId) -> Result<Vec<MicroGoal>> {
        let mut micro_goals = self.storage.list_micro_goals_for(id).await?;
        micro_goals.sort_by_key(|m| m.is_complete());
        Ok(micro_goals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalboard_storage::JsonStorage;
    use tempfile::TempDir;

    async fn manager() -> (TempDir, BasicGoalManager<JsonStorage>) {
        let dir = TempDir::new().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        (dir, BasicGoalManager::new(storage))
    }

    fn hours_spec(name: &str, total: f64) -> NewMacroGoal {
        NewMacroGoal {
            name: name.to_string(),
            goal_type: GoalType::Hours,
            total_hours: Some(total),
            ..Default::default()
        }
    }

    fn percentage_spec(name: &str) -> NewMacroGoal {
        NewMacroGoal {
            name: name.to_string(),
            goal_type: GoalType::Percentage,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_macro_goal_validates() {
        let (_dir, mut manager) = manager().await;

        let err = manager
            .create_macro_goal(NewMacroGoal {
                name: "No target".to_string(),
                goal_type: GoalType::Hours,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, GoalError::Invalid(ValidationError::MissingTotalHours)));

        let goal = manager.create_macro_goal(hours_spec("Piano", 20.0)).await.unwrap();
        assert_eq!(manager.macro_goals().await.unwrap(), vec![goal]);
        assert!(!manager.storage().has_pending_changes().await);
    }

    #[tokio::test]
    async fn test_micro_goal_needs_existing_parent() {
        let (_dir, mut manager) = manager().await;
        let orphan = MacroGoalId::new();

        let err = manager
            .create_micro_goal(NewMicroGoal::named(orphan, "Scales"))
            .await
            .unwrap_err();
        assert!(matches!(err, GoalError::MacroGoalNotFound(id) if id == orphan));
    }

    #[tokio::test]
    async fn test_delete_macro_goal_cascades() {
        let (_dir, mut manager) = manager().await;
        let keep = manager.create_macro_goal(percentage_spec("Keep")).await.unwrap();
        let doomed = manager.create_macro_goal(percentage_spec("Drop")).await.unwrap();

        manager.create_micro_goal(NewMicroGoal::named(doomed.id, "a")).await.unwrap();
        manager.create_micro_goal(NewMicroGoal::named(doomed.id, "b")).await.unwrap();
        let kept = manager.create_micro_goal(NewMicroGoal::named(keep.id, "c")).await.unwrap();

        let removed = manager.delete_macro_goal(doomed.id).await.unwrap();
        assert_eq!(removed, 2);

        assert_eq!(manager.macro_goals().await.unwrap(), vec![keep]);
        assert_eq!(manager.micro_goals().await.unwrap(), vec![kept]);

        let err = manager.delete_macro_goal(doomed.id).await.unwrap_err();
        assert!(matches!(err, GoalError::MacroGoalNotFound(_)));
    }

    #[tokio::test]
    async fn test_hours_clamped_to_target() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(hours_spec("Running", 10.0)).await.unwrap();
        let micro = manager
            .create_micro_goal(NewMicroGoal::named(goal.id, "Long run"))
            .await
            .unwrap();

        let micro = manager.log_hours(micro.id, 4.0).await.unwrap();
        assert_eq!(micro.hours, 4.0);

        let micro = manager.log_hours(micro.id, 8.0).await.unwrap();
        assert_eq!(micro.hours, 10.0);

        let micro = manager.set_hours(micro.id, -3.0).await.unwrap();
        assert_eq!(micro.hours, 0.0);

        let micro = manager
            .update_micro_goal(micro.id, MicroGoalPatch { hours: Some(25.0), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(micro.hours, 10.0);
    }

    #[tokio::test]
    async fn test_clamping_can_be_disabled() {
        let (_dir, manager) = manager().await;
        let mut manager = manager.with_config(ManagerConfig { clamp_hours_to_target: false });

        let goal = manager.create_macro_goal(hours_spec("Running", 10.0)).await.unwrap();
        let micro = manager
            .create_micro_goal(NewMicroGoal::named(goal.id, "Long run"))
            .await
            .unwrap();

        let micro = manager.set_hours(micro.id, 30.0).await.unwrap();
        assert_eq!(micro.hours, 30.0);
    }

    #[tokio::test]
    async fn test_update_micro_goal_rejects_bad_completion() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(percentage_spec("Study")).await.unwrap();
        let micro = manager
            .create_micro_goal(NewMicroGoal::named(goal.id, "Chapter 1"))
            .await
            .unwrap();

        let patch = MicroGoalPatch {
            completion: Some(120.0),
            ..Default::default()
        };
        let err = manager.update_micro_goal(micro.id, patch).await.unwrap_err();
        assert!(matches!(err, GoalError::Invalid(ValidationError::CompletionOutOfRange(_))));

        let micro = manager.set_completion(micro.id, 120.0).await.unwrap();
        assert_eq!(micro.completion, 100.0);
    }

    #[tokio::test]
    async fn test_toggle_by_goal_type() {
        let (_dir, mut manager) = manager().await;
        let hours = manager.create_macro_goal(hours_spec("Running", 12.0)).await.unwrap();
        let pct = manager.create_macro_goal(percentage_spec("Study")).await.unwrap();

        let run = manager.create_micro_goal(NewMicroGoal::named(hours.id, "Run")).await.unwrap();
        let read = manager.create_micro_goal(NewMicroGoal::named(pct.id, "Read")).await.unwrap();

        let run = manager.toggle_micro_goal(run.id, true).await.unwrap();
        assert_eq!(run.hours, 12.0);
        assert_eq!(run.completion, 100.0);

        let read = manager.toggle_micro_goal(read.id, true).await.unwrap();
        assert_eq!(read.completion, 100.0);
        assert_eq!(read.hours, 0.0);

        let run = manager.toggle_micro_goal(run.id, false).await.unwrap();
        assert_eq!(run.hours, 0.0);
        assert_eq!(run.completion, 0.0);
    }

    #[tokio::test]
    async fn test_micro_goals_for_puts_unfinished_first() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(percentage_spec("Study")).await.unwrap();

        let first = manager.create_micro_goal(NewMicroGoal::named(goal.id, "first")).await.unwrap();
        let second = manager
            .create_micro_goal(NewMicroGoal::named(goal.id, "second"))
            .await
            .unwrap();
        manager.toggle_micro_goal(first.id, true).await.unwrap();

        let ordered = manager.micro_goals_for(goal.id).await.unwrap();
        assert_eq!(ordered.len(), 2);
        assert_eq!(ordered[0].id, second.id);
        assert_eq!(ordered[1].id, first.id);
    }

    #[tokio::test]
    async fn test_update_macro_goal() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(hours_spec("Running", 10.0)).await.unwrap();

        let patch = MacroGoalPatch {
            name: Some("Trail running".to_string()),
            ..Default::default()
        };
        let updated = manager.update_macro_goal(goal.id, patch).await.unwrap();
        assert_eq!(updated.name, "Trail running");
        assert_eq!(updated.total_hours, Some(10.0));

        let patch = MacroGoalPatch {
            total_hours: Some(0.0),
            ..Default::default()
        };
        let err = manager.update_macro_goal(goal.id, patch).await.unwrap_err();
        assert!(matches!(err, GoalError::Invalid(ValidationError::InvalidTotalHours(_))));
    }

    #[tokio::test]
    async fn test_missing_micro_goal() {
        let (_dir, mut manager) = manager().await;
        let err = manager.delete_micro_goal(MicroGoalId::new()).await.unwrap_err();
        assert!(matches!(err, GoalError::MicroGoalNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_finite_hours_keep_logged_progress() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(hours_spec("Running", 10.0)).await.unwrap();
        let micro = manager
            .create_micro_goal(NewMicroGoal::named(goal.id, "Long run"))
            .await
            .unwrap();
        manager.log_hours(micro.id, 6.0).await.unwrap();

        for bad in [f64::NAN, f64::INFINITY] {
            let err = manager.log_hours(micro.id, bad).await.unwrap_err();
            assert!(matches!(err, GoalError::Invalid(ValidationError::NegativeHours(_))));
            let err = manager.set_hours(micro.id, bad).await.unwrap_err();
            assert!(matches!(err, GoalError::Invalid(ValidationError::NegativeHours(_))));
        }

        let stored = manager.micro_goals_for(goal.id).await.unwrap();
        assert_eq!(stored[0].hours, 6.0);
    }

    #[tokio::test]
    async fn test_update_micro_goal_needs_parent() {
        let (_dir, mut manager) = manager().await;
        let orphan = MicroGoal::new(NewMicroGoal::named(MacroGoalId::new(), "Stray"));
        manager.storage.save_micro_goal(&orphan).await.unwrap();

        let patch = MicroGoalPatch {
            hours: Some(3.0),
            ..Default::default()
        };
        let err = manager.update_micro_goal(orphan.id, patch).await.unwrap_err();
        assert!(matches!(err, GoalError::MacroGoalNotFound(id) if id == orphan.macro_goal_id));
    }

    #[tokio::test]
    async fn test_macro_goal_lookup() {
        let (_dir, mut manager) = manager().await;
        let goal = manager.create_macro_goal(percentage_spec("Study")).await.unwrap();

        assert_eq!(manager.macro_goal(goal.id).await.unwrap(), goal);
        let err = manager.macro_goal(MacroGoalId::new()).await.unwrap_err();
        assert!(matches!(err, GoalError::MacroGoalNotFound(_)));
    }
}
