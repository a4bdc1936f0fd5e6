//! Goal Management
//!
//! Validated create/update/delete of macro and micro goals on top of a
//! storage backend, including cascade deletes and edit-time clamping.

#![warn(missing_docs)]

pub mod error;
pub mod manager;

pub use error::{GoalError, Result};
pub use manager::{BasicGoalManager, GoalManager, ManagerConfig};
