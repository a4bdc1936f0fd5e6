//! Progress Tracking
//!
//! Goal completion, dashboard statistics, ranks and badges.

#![warn(missing_docs)]

pub mod completion;
pub mod stats;
pub mod badge;
pub mod tracker;

pub use completion::{macro_completion, micro_contribution, overall_completion};
pub use stats::{
    round_percent, DashboardStats, GoalProgressRow, GoalStatus, MicroGoalStats, StatusBreakdown,
    TypeBreakdown,
};
pub use badge::{evaluate_badges, milestones, Badge, BadgeKind, Milestone, Rank};
pub use tracker::{BasicProgressTracker, ProgressConfig, ProgressSnapshot, ProgressTracker};
