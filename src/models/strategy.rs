//! AI strategy classification.

use serde::{Deserialize, Serialize};

/// Names that never describe a real AI strategy profile.
const PLACEHOLDER_NAMES: [&str; 4] = ["unknown", "com", "player", "default"];

/// Broad family of an AI strategy, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StrategyType {
    Attack,
    Defense,
    Balanced,
    Other,
}

impl StrategyType {
    /// Classify a strategy by case-insensitive substring match on its name.
    pub fn from_name(name: &str) -> Self {
        let lower = name.trim().to_lowercase();

        if PLACEHOLDER_NAMES.contains(&lower.as_str()) {
            StrategyType::Other
        } else if lower.contains("attack strategy") {
            StrategyType::Attack
        } else if lower.contains("defense strategy") {
            StrategyType::Defense
        } else if lower.contains("balanced strategy") {
            StrategyType::Balanced
        } else {
            StrategyType::Other
        }
    }
}

impl std::fmt::Display for StrategyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyType::Attack => write!(f, "Attack"),
            StrategyType::Defense => write!(f, "Defense"),
            StrategyType::Balanced => write!(f, "Balanced"),
            StrategyType::Other => write!(f, "Other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_type_from_name() {
        assert_eq!(StrategyType::from_name("Attack Strategy"), StrategyType::Attack);
        assert_eq!(
            StrategyType::from_name("Super Attack Strategy Lv.2"),
            StrategyType::Attack
        );
        assert_eq!(StrategyType::from_name("DEFENSE STRATEGY"), StrategyType::Defense);
        assert_eq!(
            StrategyType::from_name("balanced strategy (ranked)"),
            StrategyType::Balanced
        );
        assert_eq!(StrategyType::from_name("Ki Blast Strategy"), StrategyType::Other);
    }

    #[test]
    fn test_strategy_type_placeholders() {
        assert_eq!(StrategyType::from_name("Unknown"), StrategyType::Other);
        assert_eq!(StrategyType::from_name("COM"), StrategyType::Other);
        assert_eq!(StrategyType::from_name("Player"), StrategyType::Other);
        assert_eq!(StrategyType::from_name("default"), StrategyType::Other);
    }

    #[test]
    fn test_strategy_type_display() {
        assert_eq!(format!("{}", StrategyType::Attack), "Attack");
        assert_eq!(format!("{}", StrategyType::Other), "Other");
    }
}
