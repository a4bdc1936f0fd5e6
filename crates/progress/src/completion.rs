//! Completion calculator.
//!
//! Rolls micro goal records up into a 0-100 completion figure per macro
//! goal, and macro goals up into one overall figure. Every dashboard view
//! (progress bars, status charts, badge unlocks) reads its numbers from
//! here.

use goalboard_core::{GoalType, MacroGoal, MicroGoal};

/// Completion of one macro goal, in percent.
///
/// Only micro goals whose `macro_goal_id` matches `goal` are considered, so
/// callers can pass the full collection.
///
/// - No matching micro goals: `0`.
/// - [`GoalType::Hours`]: summed hours over the target, times 100. A missing
///   or non-positive target yields `0` instead of dividing by zero.
/// - [`GoalType::Percentage`]: mean of the micro goals' `completion`.
///
/// Hours overshoot is not clamped: 30 hours logged against a 20 hour target
/// reports 150.
pub fn macro_completion(goal: &MacroGoal, micro_goals: &[MicroGoal]) -> f64 {
    let related: Vec<&MicroGoal> = micro_goals
        .iter()
        .filter(|m| m.macro_goal_id == goal.id)
        .collect();

    if related.is_empty() {
        return 0.0;
    }

    match goal.goal_type {
        GoalType::Hours => {
            let completed_hours = stable_sum(related.iter().map(|m| m.hours));
            let total_hours = goal.target_hours();
            if total_hours > 0.0 {
                (completed_hours / total_hours) * 100.0
            } else {
                0.0
            }
        }
        GoalType::Percentage => mean(related.iter().map(|m| m.completion)),
    }
}

/// Unweighted mean of [`macro_completion`] over `macro_goals`.
///
/// A goal with one micro goal counts as much as a goal with fifty. An empty
/// goal list yields `0`.
pub fn overall_completion(macro_goals: &[MacroGoal], micro_goals: &[MicroGoal]) -> f64 {
    mean(macro_goals.iter().map(|g| macro_completion(g, micro_goals)))
}

/// Progress a single micro goal shows on its own row.
///
/// Hours goals report the item's share of the parent target, treating a
/// missing or zero target as one hour. Percentage goals report the item's
/// own completion.
pub fn micro_contribution(parent: &MacroGoal, micro: &MicroGoal) -> f64 {
    match parent.goal_type {
        GoalType::Hours => {
            let target = match parent.target_hours() {
                t if t > 0.0 => t,
                _ => 1.0,
            };
            (micro.hours / target) * 100.0
        }
        GoalType::Percentage => micro.completion,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    stable_sum(values.into_iter()) / count
}

// Summed in sorted order so the result is bit-identical for any input order.
fn stable_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}
