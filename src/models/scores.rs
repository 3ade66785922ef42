//! Normalized behavioral scores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A behavioral dimension rescaled to 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    // Composites
    Offense,
    Defense,
    Aggression,
    Zoning,
    Resource,
    ComboFocus,

    // Single actions
    DamageDealt,
    S1Blast,
    S2Blast,
    UltBlast,
    KiBlast,
    Charge,
    Throws,
    Vanishing,
    DragonHoming,
    Lightning,
    SpeedImpact,
    Sparking,
    SparkingCombo,
    DragonDash,
    Guard,
    ZCounter,
    SuperCounter,
    RevengeCounter,
    Skill1,
    Skill2,
    MaxCombo,
}

impl Dimension {
    pub const ALL: [Dimension; 27] = [
        Dimension::Offense,
        Dimension::Defense,
        Dimension::Aggression,
        Dimension::Zoning,
        Dimension::Resource,
        Dimension::ComboFocus,
        Dimension::DamageDealt,
        Dimension::S1Blast,
        Dimension::S2Blast,
        Dimension::UltBlast,
        Dimension::KiBlast,
        Dimension::Charge,
        Dimension::Throws,
        Dimension::Vanishing,
        Dimension::DragonHoming,
        Dimension::Lightning,
        Dimension::SpeedImpact,
        Dimension::Sparking,
        Dimension::SparkingCombo,
        Dimension::DragonDash,
        Dimension::Guard,
        Dimension::ZCounter,
        Dimension::SuperCounter,
        Dimension::RevengeCounter,
        Dimension::Skill1,
        Dimension::Skill2,
        Dimension::MaxCombo,
    ];
}

/// Every dimension's score for one AI strategy, each in [0, 100].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedScores(BTreeMap<Dimension, f64>);

impl NormalizedScores {
    /// Record a score, clamped to [0, 100]. Non-finite values become 0.
    pub fn set(&mut self, dimension: Dimension, score: f64) {
        let score = if score.is_finite() {
            score.clamp(0.0, 100.0)
        } else {
            0.0
        };
        self.0.insert(dimension, score);
    }

    /// Score for a dimension (0 if never set).
    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Builder method to set a score.
    pub fn with(mut self, dimension: Dimension, score: f64) -> Self {
        self.set(dimension, score);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(d, v)| (*d, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Dimension, f64)> for NormalizedScores {
    fn from_iter<I: IntoIterator<Item = (Dimension, f64)>>(iter: I) -> Self {
        let mut scores = NormalizedScores::default();
        for (dimension, score) in iter {
            scores.set(dimension, score);
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_are_clamped() {
        let scores = NormalizedScores::default()
            .with(Dimension::Offense, 140.0)
            .with(Dimension::Defense, -3.0)
            .with(Dimension::Zoning, f64::NAN)
            .with(Dimension::Throws, 42.5);

        assert_eq!(scores.get(Dimension::Offense), 100.0);
        assert_eq!(scores.get(Dimension::Defense), 0.0);
        assert_eq!(scores.get(Dimension::Zoning), 0.0);
        assert_eq!(scores.get(Dimension::Throws), 42.5);
        assert_eq!(scores.get(Dimension::Guard), 0.0);
        assert_eq!(scores.len(), 4);
    }

    #[test]
    fn test_scores_serialize_as_map() {
        let scores: NormalizedScores = [(Dimension::ComboFocus, 55.0)].into_iter().collect();
        let json = serde_json::to_value(&scores).unwrap();
        assert_eq!(json["combo_focus"], 55.0);
    }
}
