//! Unique identifiers for goalboard entities.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique identifier for a MacroGoal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacroGoalId(Ulid);

impl MacroGoalId {
    /// Generate a new MacroGoalId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MacroGoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MacroGoalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MacroGoalId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a MicroGoal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MicroGoalId(Ulid);

impl MicroGoalId {
    /// Generate a new MicroGoalId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MicroGoalId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MicroGoalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MicroGoalId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_from_display() {
        let id = MacroGoalId::new();
        let parsed: MacroGoalId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);

        let id = MicroGoalId::new();
        let parsed: MicroGoalId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_id_rejects_garbage() {
        assert!("not-a-ulid".parse::<MacroGoalId>().is_err());
        assert!("".parse::<MicroGoalId>().is_err());
    }
}
