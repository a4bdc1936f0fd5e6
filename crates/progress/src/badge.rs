//! Ranks, achievement badges and milestones.

use goalboard_core::{MacroGoal, MicroGoal};
use serde::Serialize;

use crate::completion::{macro_completion, overall_completion};
use crate::stats::GoalStatus;
use crate::ProgressConfig;

/// Rank shown next to the overall progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rank {
    /// Below 25%
    Awakening,
    /// 25% and up
    NoviceWarrior,
    /// 50% and up
    SkilledFighter,
    /// 75% and up
    EliteHunter,
    /// 90% and up
    LegendaryWarrior,
}

impl Rank {
    /// Highest rank whose threshold `overall` reaches.
    pub fn from_completion(overall: f64) -> Self {
        if overall >= 90.0 {
            Rank::LegendaryWarrior
        } else if overall >= 75.0 {
            Rank::EliteHunter
        } else if overall >= 50.0 {
            Rank::SkilledFighter
        } else if overall >= 25.0 {
            Rank::NoviceWarrior
        } else {
            Rank::Awakening
        }
    }

    /// Minimum overall completion for this rank.
    pub fn threshold(&self) -> f64 {
        match self {
            Rank::Awakening => 0.0,
            Rank::NoviceWarrior => 25.0,
            Rank::SkilledFighter => 50.0,
            Rank::EliteHunter => 75.0,
            Rank::LegendaryWarrior => 90.0,
        }
    }

    /// Display title.
    pub fn title(&self) -> &'static str {
        match self {
            Rank::Awakening => "Awakening",
            Rank::NoviceWarrior => "Novice Warrior",
            Rank::SkilledFighter => "Skilled Fighter",
            Rank::EliteHunter => "Elite Hunter",
            Rank::LegendaryWarrior => "Legendary Warrior",
        }
    }

    /// Display emoji.
    pub fn emoji(&self) -> &'static str {
        match self {
            Rank::Awakening => "🌱",
            Rank::NoviceWarrior => "🛡️",
            Rank::SkilledFighter => "🗡️",
            Rank::EliteHunter => "⭐",
            Rank::LegendaryWarrior => "👑",
        }
    }

    /// Motivational line for this rank.
    pub fn quote(&self) -> &'static str {
        match self {
            Rank::Awakening => "The first step is always the hardest. Begin your awakening now.",
            Rank::NoviceWarrior => "Every master was once a beginner. Your journey has just begun.",
            Rank::SkilledFighter => {
                "The path to greatness requires persistence. You are on the right track."
            }
            Rank::EliteHunter => "Your strength grows with each challenge. Keep pushing forward.",
            Rank::LegendaryWarrior => {
                "You've reached the pinnacle of power. The warrior's path is complete."
            }
        }
    }
}

/// Achievement kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum BadgeKind {
    Awakening,
    Novice,
    Skilled,
    Elite,
    Legendary,
    King,
    /// Every macro goal completed
    GoalMaster,
    /// Enough micro goals completed
    TaskCrusher,
}

/// An achievement and whether it has been earned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Badge {
    pub kind: BadgeKind,
    pub name: &'static str,
    pub description: String,
    pub icon: &'static str,
    pub unlocked: bool,
    /// Progress text, e.g. `3/10 tasks`
    pub requirement: String,
}

impl Badge {
    fn tier(
        kind: BadgeKind,
        name: &'static str,
        icon: &'static str,
        threshold: f64,
        overall: f64,
    ) -> Self {
        let description = if threshold > 0.0 {
            format!("Reach {}% completion", threshold)
        } else {
            "Start your journey".to_string()
        };
        Self {
            kind,
            name,
            description,
            icon,
            unlocked: overall >= threshold,
            requirement: format!("{}% completion", threshold),
        }
    }
}

/// Evaluate every badge against the current goal records.
pub fn evaluate_badges(
    macro_goals: &[MacroGoal],
    micro_goals: &[MicroGoal],
    config: &ProgressConfig,
) -> Vec<Badge> {
    let overall = overall_completion(macro_goals, micro_goals);

    let completed_goals = macro_goals
        .iter()
        .map(|g| GoalStatus::from_completion(macro_completion(g, micro_goals)))
        .filter(|status| *status == GoalStatus::Completed)
        .count();
    let completed_micro_goals = micro_goals.iter().filter(|m| m.is_complete()).count();

    vec![
        Badge::tier(BadgeKind::Awakening, "Awakening", "🌱", 0.0, overall),
        Badge::tier(BadgeKind::Novice, "Novice Warrior", "🛡️", 25.0, overall),
        Badge::tier(BadgeKind::Skilled, "Skilled Fighter", "🗡️", 50.0, overall),
        Badge::tier(BadgeKind::Elite, "Elite Hunter", "⭐", 75.0, overall),
        Badge::tier(BadgeKind::Legendary, "Legendary Warrior", "👑", 90.0, overall),
        Badge::tier(BadgeKind::King, "King of War", "⚡", 100.0, overall),
        Badge {
            kind: BadgeKind::GoalMaster,
            name: "Goal Master",
            description: "Complete all macro goals".to_string(),
            icon: "🎯",
            unlocked: !macro_goals.is_empty() && completed_goals == macro_goals.len(),
            requirement: format!("{}/{} goals", completed_goals, macro_goals.len()),
        },
        Badge {
            kind: BadgeKind::TaskCrusher,
            name: "Task Crusher",
            description: format!("Complete {} micro goals", config.micro_goal_target),
            icon: "💪",
            unlocked: completed_micro_goals >= config.micro_goal_target,
            requirement: format!("{}/{} tasks", completed_micro_goals, config.micro_goal_target),
        },
    ]
}

/// A completion checkpoint on a single goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    /// Display name
    pub name: String,
    /// Completion percent to reach
    pub value: u32,
    /// Whether the goal has reached it
    pub achieved: bool,
}

/// Quarter checkpoints for one goal's completion.
pub fn milestones(completion: f64) -> Vec<Milestone> {
    [25u32, 50, 75, 100]
        .into_iter()
        .map(|value| Milestone {
            name: format!("{}% Complete", value),
            value,
            achieved: completion >= f64::from(value),
        })
        .collect()
}
