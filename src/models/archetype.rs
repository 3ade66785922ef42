//! Playstyle archetype results.

use serde::{Deserialize, Serialize};

/// How well a strategy fits one archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeMatch {
    pub name: String,
    /// Match score (0 to 100)
    pub score: f64,
    pub description: String,
    pub icon: String,
    pub color: String,
}

/// Archetypes assigned to one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeProfile {
    pub primary: ArchetypeMatch,

    /// Runner-up, if it is strong and close to the primary
    pub secondary: Option<ArchetypeMatch>,

    /// Sorted by score, highest first
    pub sub_types: Vec<ArchetypeMatch>,
}

impl ArchetypeProfile {
    /// Sub-type names, truncated for display.
    pub fn sub_type_names(&self, limit: usize) -> Vec<&str> {
        self.sub_types
            .iter()
            .take(limit)
            .map(|s| s.name.as_str())
            .collect()
    }

    /// "Primary / Secondary" label.
    pub fn headline(&self) -> String {
        match &self.secondary {
            Some(secondary) => format!("{} / {}", self.primary.name, secondary.name),
            None => self.primary.name.clone(),
        }
    }
}
