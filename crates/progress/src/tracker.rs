//! Progress tracking service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use goalboard_core::MacroGoalId;
use goalboard_storage::{Result, Storage};
use serde::Serialize;
use tracing::debug;

use crate::badge::{evaluate_badges, Badge, Rank};
use crate::completion::{macro_completion, overall_completion};
use crate::stats::DashboardStats;

/// Configuration for progress reporting.
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Completed micro goals needed for the Task Crusher badge
    pub micro_goal_target: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            micro_goal_target: 10,
        }
    }
}

/// Progress tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Completion of one macro goal, `None` if it does not exist.
    async fn goal_completion(&self, goal_id: MacroGoalId) -> Result<Option<f64>>;

    /// Unweighted mean completion over all macro goals.
    async fn overall_completion(&self) -> Result<f64>;

    /// Take a progress snapshot.
    async fn snapshot(&self) -> Result<ProgressSnapshot>;
}

/// A snapshot of progress at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    /// When snapshot was taken
    pub timestamp: DateTime<Utc>,

    /// Completion by goal ID, newest goal first
    pub goals: Vec<(MacroGoalId, f64)>,

    /// Overall completion
    pub overall: f64,

    /// Rank earned by the overall completion
    pub rank: Rank,

    /// Dashboard figures
    pub stats: DashboardStats,

    /// Badge states
    pub badges: Vec<Badge>,
}

/// Basic progress tracker implementation.
pub struct BasicProgressTracker<S: Storage> {
    storage: std::sync::Arc<S>,
    config: ProgressConfig,
}

impl<S: Storage> BasicProgressTracker<S> {
    /// Create a new progress tracker.
    pub fn new(storage: S) -> Self {
        Self::from_shared(std::sync::Arc::new(storage))
    }

    /// Create a tracker over storage shared with other services.
    pub fn from_shared(storage: std::sync::Arc<S>) -> Self {
        Self {
            storage,
            config: ProgressConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for BasicProgressTracker<S> {
    async fn goal_completion(&self, goal_id: MacroGoalId) -> Result<Option<f64>> {
        let Some(goal) = self.storage.load_macro_goal(goal_id).await? else {
            return Ok(None);
        };
        let micro_goals = self.storage.list_micro_goals_for(goal_id).await?;
        let completion = macro_completion(&goal, &micro_goals);
        debug!(goal = %goal_id, completion, "Computed goal completion");
        Ok(Some(completion))
    }

    async fn overall_completion(&self) -> Result<f64> {
        let macro_goals = self.storage.list_macro_goals().await?;
        let micro_goals = self.storage.list_micro_goals().await?;
        Ok(overall_completion(&macro_goals, &micro_goals))
    }

    async fn snapshot(&self) -> Result<ProgressSnapshot> {
        let macro_goals = self.storage.list_macro_goals().await?;
        let micro_goals = self.storage.list_micro_goals().await?;

        let goals = macro_goals
            .iter()
            .map(|g| (g.id, macro_completion(g, &micro_goals)))
            .collect();
        let stats = DashboardStats::compute(&macro_goals, &micro_goals);
        let badges = evaluate_badges(&macro_goals, &micro_goals, &self.config);

        debug!(
            goals = macro_goals.len(),
            micro_goals = micro_goals.len(),
            overall = stats.overall_completion,
            "Took progress snapshot"
        );

        Ok(ProgressSnapshot {
            timestamp: Utc::now(),
            goals,
            overall: stats.overall_completion,
            rank: Rank::from_completion(stats.overall_completion),
            stats,
            badges,
        })
    }
}
