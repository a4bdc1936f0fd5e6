//! Dashboard statistics derived from goal records.

use goalboard_core::{GoalType, MacroGoal, MacroGoalId, MicroGoal};
use serde::Serialize;

use crate::completion::{macro_completion, overall_completion};

/// Where a macro goal stands, judged from its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalStatus {
    /// Nothing done yet
    NotStarted,
    /// Some progress, below 100%
    InProgress,
    /// At or beyond 100%
    Completed,
}

impl GoalStatus {
    /// Classify a completion value. Hours overshoot counts as completed.
    pub fn from_completion(completion: f64) -> Self {
        if completion >= 100.0 {
            GoalStatus::Completed
        } else if completion > 0.0 {
            GoalStatus::InProgress
        } else {
            GoalStatus::NotStarted
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            GoalStatus::NotStarted => "Not Started",
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
        }
    }
}

/// Macro goal counts per status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct StatusBreakdown {
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

impl StatusBreakdown {
    fn record(&mut self, status: GoalStatus) {
        match status {
            GoalStatus::Completed => self.completed += 1,
            GoalStatus::InProgress => self.in_progress += 1,
            GoalStatus::NotStarted => self.not_started += 1,
        }
    }
}

/// Macro goal counts per tracking type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TypeBreakdown {
    pub percentage: usize,
    pub hours: usize,
}

/// Aggregate figures over all micro goals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicroGoalStats {
    /// Number of micro goals
    pub total: usize,
    /// Items at 100% or with any hours logged
    pub completed: usize,
    /// Mean completion, rounded to a whole percent
    pub average_completion: u32,
}

impl MicroGoalStats {
    /// Compute over every micro goal regardless of parent.
    pub fn compute(micro_goals: &[MicroGoal]) -> Self {
        let total = micro_goals.len();
        let completed = micro_goals
            .iter()
            .filter(|m| m.is_complete() || m.hours > 0.0)
            .count();
        let average_completion = if total > 0 {
            let sum: f64 = micro_goals.iter().map(|m| m.completion).sum();
            round_percent(sum / total as f64)
        } else {
            0
        };

        Self {
            total,
            completed,
            average_completion,
        }
    }
}

/// One bar in the per-goal progress chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgressRow {
    /// Goal ID
    pub id: MacroGoalId,
    /// Goal name
    pub name: String,
    /// Goal icon
    pub icon: Option<String>,
    /// Completion rounded to a whole percent
    pub completion: u32,
    /// Status from the unrounded completion
    pub status: GoalStatus,
}

/// Everything the dashboard overview shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Number of macro goals
    pub total_goals: usize,
    /// Unweighted mean completion
    pub overall_completion: f64,
    /// Goals per status
    pub status: StatusBreakdown,
    /// Goals per tracking type
    pub types: TypeBreakdown,
    /// Micro goal figures
    pub micro_goals: MicroGoalStats,
    /// Rows in the same order as the macro goals passed in
    pub goal_progress: Vec<GoalProgressRow>,
}

impl DashboardStats {
    /// Compute dashboard figures from goal records.
    pub fn compute(macro_goals: &[MacroGoal], micro_goals: &[MicroGoal]) -> Self {
        let mut status = StatusBreakdown::default();
        let mut types = TypeBreakdown::default();
        let mut goal_progress = Vec::with_capacity(macro_goals.len());

        for goal in macro_goals {
            let completion = macro_completion(goal, micro_goals);
            let goal_status = GoalStatus::from_completion(completion);
            status.record(goal_status);

            match goal.goal_type {
                GoalType::Percentage => types.percentage += 1,
                GoalType::Hours => types.hours += 1,
            }

            goal_progress.push(GoalProgressRow {
                id: goal.id,
                name: goal.name.clone(),
                icon: goal.icon.clone(),
                completion: round_percent(completion),
                status: goal_status,
            });
        }

        Self {
            total_goals: macro_goals.len(),
            overall_completion: overall_completion(macro_goals, micro_goals),
            status,
            types,
            micro_goals: MicroGoalStats::compute(micro_goals),
            goal_progress,
        }
    }
}

/// Round a percentage for display. Negative input reads as zero.
pub fn round_percent(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use goalboard_core::{NewMacroGoal, NewMicroGoal};

    fn goal(goal_type: GoalType, total_hours: Option<f64>) -> MacroGoal {
        MacroGoal::new(NewMacroGoal {
            name: format!("{} goal", goal_type),
            goal_type,
            total_hours,
            icon: Some("🎯".to_string()),
            ..Default::default()
        })
    }

    fn micro(parent: &MacroGoal, completion: f64, hours: f64) -> MicroGoal {
        MicroGoal::new(NewMicroGoal {
            macro_goal_id: parent.id,
            name: "item".to_string(),
            completion: Some(completion),
            hours: Some(hours),
        })
    }

    #[test]
    fn test_status_from_completion() {
        assert_eq!(GoalStatus::from_completion(0.0), GoalStatus::NotStarted);
        assert_eq!(GoalStatus::from_completion(0.4), GoalStatus::InProgress);
        assert_eq!(GoalStatus::from_completion(99.9), GoalStatus::InProgress);
        assert_eq!(GoalStatus::from_completion(100.0), GoalStatus::Completed);
        assert_eq!(GoalStatus::from_completion(150.0), GoalStatus::Completed);
    }

    #[test]
    fn test_empty_dashboard() {
        let stats = DashboardStats::compute(&[], &[]);
        assert_eq!(stats.total_goals, 0);
        assert_eq!(stats.overall_completion, 0.0);
        assert_eq!(stats.status, StatusBreakdown::default());
        assert_eq!(stats.micro_goals, MicroGoalStats::default());
        assert!(stats.goal_progress.is_empty());
    }

    #[test]
    fn test_dashboard_breakdowns() {
        let done = goal(GoalType::Percentage, None);
        let half = goal(GoalType::Hours, Some(10.0));
        let idle = goal(GoalType::Percentage, None);
        let over = goal(GoalType::Hours, Some(2.0));

        let micros = vec![
            micro(&done, 100.0, 0.0),
            micro(&half, 0.0, 5.0),
            micro(&idle, 0.0, 0.0),
            micro(&over, 0.0, 3.0),
        ];
        let macros = vec![done.clone(), half, idle, over];

        let stats = DashboardStats::compute(&macros, &micros);

        assert_eq!(stats.total_goals, 4);
        assert_eq!(
            stats.status,
            StatusBreakdown { completed: 2, in_progress: 1, not_started: 1 }
        );
        assert_eq!(stats.types, TypeBreakdown { percentage: 2, hours: 2 });
        assert_eq!(stats.goal_progress[0].id, done.id);
        assert_eq!(stats.goal_progress[1].completion, 50);
        assert_eq!(stats.goal_progress[3].completion, 150);
        // (100 + 50 + 0 + 150) / 4
        assert_eq!(stats.overall_completion, 75.0);
    }

    #[test]
    fn test_micro_goal_stats() {
        let parent = goal(GoalType::Percentage, None);
        let micros = vec![
            micro(&parent, 100.0, 0.0),
            micro(&parent, 25.0, 1.5),
            micro(&parent, 0.0, 0.0),
        ];

        let stats = MicroGoalStats::compute(&micros);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        // 125 / 3 = 41.67
        assert_eq!(stats.average_completion, 42);
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(49.5), 50);
        assert_eq!(round_percent(49.4), 49);
        assert_eq!(round_percent(-3.0), 0);
    }
}
