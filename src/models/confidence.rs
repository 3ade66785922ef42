//! Sample-size confidence for derived statistics.

use serde::{Deserialize, Serialize};

/// How far derived statistics can be trusted given the sample behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Confidence {
    /// Large sample with broad character coverage
    High,
    /// Usable sample, patterns may still shift
    Medium,
    /// Too few matches or too narrow a roster
    #[default]
    Low,
}

impl Confidence {
    /// Classify from match count and character diversity.
    pub fn from_sample(matches: u32, diversity: f64) -> Self {
        if (matches >= 75 && diversity >= 0.40)
            || (matches >= 50 && diversity >= 0.55)
            || diversity >= 0.90
        {
            Confidence::High
        } else if (matches >= 30 && diversity >= 0.35) || (matches >= 20 && diversity >= 0.50) {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Returns true if the sample is large enough to report without a caveat.
    pub fn is_reliable(&self) -> bool {
        matches!(self, Confidence::High | Confidence::Medium)
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// Sample quality attached to every strategy's metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DataQuality {
    pub confidence: Confidence,

    /// Character coverage relative to sample size (0.0 to 1.0)
    pub diversity_score: f64,

    pub sample_size: u32,

    pub unique_characters: u32,
}
