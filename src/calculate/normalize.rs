//! Rescaling raw behavioral values onto 0–100.
//!
//! Two bases are supported. Against the population, each dimension is scaled
//! between the lowest and highest value of every strategy with enough matches.
//! Against a character baseline, the character's own average defines 50 and
//! twice that average defines 100.

use std::collections::BTreeMap;

use super::round_to;
use crate::models::{
    CharacterBaseline, Dimension, NormalizedScores, StrategyMetrics, StrategyMetricsMap,
};

/// Strategies need this many matches to shape the population range.
pub const MIN_MATCHES_FOR_RANGE: u32 = 5;

/// Score given to every strategy when a dimension carries no signal.
const NO_SIGNAL: f64 = 50.0;

/// Raw value of a dimension for one strategy.
///
/// Composite weights are fixed constants.
pub fn raw_value(dimension: Dimension, m: &StrategyMetrics) -> f64 {
    match dimension {
        Dimension::Offense => {
            m.avg_damage_dealt + m.avg_s2_blast * 1000.0 + m.avg_ult_blast * 2000.0
        }
        Dimension::Defense => {
            m.avg_guard * 100.0
                + m.avg_z_counter * 500.0
                + m.avg_super_counter * 800.0
                + m.avg_revenge_counter * 600.0
                + m.survival_rate * 50.0
        }
        Dimension::Aggression => {
            m.avg_throws * 300.0
                + m.avg_vanishing * 400.0
                + m.avg_dragon_homing * 300.0
                + m.avg_lightning * 300.0
                + m.avg_speed_impact * 200.0
                + m.avg_dragon_dash
        }
        Dimension::Zoning => {
            m.avg_ki_blast * 100.0
                + m.avg_s1_blast * 500.0
                + m.avg_s2_blast * 500.0
                + m.avg_charge * 50.0
        }
        Dimension::Resource => {
            m.avg_charge * 100.0
                + m.avg_sparking * 500.0
                + m.avg_skill1 * 300.0
                + m.avg_skill2 * 300.0
        }
        Dimension::ComboFocus => {
            m.avg_max_combo * 100.0 + m.avg_max_combo_damage + m.avg_sparking_combo * 500.0
        }
        Dimension::DamageDealt => m.avg_damage_dealt,
        Dimension::S1Blast => m.avg_s1_blast,
        Dimension::S2Blast => m.avg_s2_blast,
        Dimension::UltBlast => m.avg_ult_blast,
        Dimension::KiBlast => m.avg_ki_blast,
        Dimension::Charge => m.avg_charge,
        Dimension::Throws => m.avg_throws,
        Dimension::Vanishing => m.avg_vanishing,
        Dimension::DragonHoming => m.avg_dragon_homing,
        Dimension::Lightning => m.avg_lightning,
        Dimension::SpeedImpact => m.avg_speed_impact,
        Dimension::Sparking => m.avg_sparking,
        Dimension::SparkingCombo => m.avg_sparking_combo,
        Dimension::DragonDash => m.avg_dragon_dash,
        Dimension::Guard => m.avg_guard,
        Dimension::ZCounter => m.avg_z_counter,
        Dimension::SuperCounter => m.avg_super_counter,
        Dimension::RevengeCounter => m.avg_revenge_counter,
        Dimension::Skill1 => m.avg_skill1,
        Dimension::Skill2 => m.avg_skill2,
        Dimension::MaxCombo => m.avg_max_combo,
    }
}

/// Linear position of `value` within `[min, max]`, as 0–100.
pub fn scale_to_range(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        NO_SIGNAL
    } else if value <= min {
        0.0
    } else if value >= max {
        100.0
    } else {
        round_to((value - min) / (max - min) * 100.0, 1)
    }
}

/// Position of `value` within `[0, 2 × baseline]`, as 0–100.
pub fn scale_to_baseline(value: f64, baseline: f64) -> f64 {
    if baseline > 0.0 {
        round_to((value / (baseline * 2.0) * 100.0).clamp(0.0, 100.0), 1)
    } else if value > 0.0 {
        100.0
    } else {
        NO_SIGNAL
    }
}

/// Per-dimension min/max across the strategy population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DimensionRanges {
    ranges: BTreeMap<Dimension, (f64, f64)>,
}

impl DimensionRanges {
    /// Ranges over strategies with at least five matches, or over every
    /// strategy when none has that many.
    pub fn from_population(all: &StrategyMetricsMap) -> Self {
        let eligible: Vec<&StrategyMetrics> = all
            .values()
            .filter(|m| m.total_matches >= MIN_MATCHES_FOR_RANGE)
            .collect();
        let population: Vec<&StrategyMetrics> = if eligible.is_empty() {
            all.values().collect()
        } else {
            eligible
        };

        let mut ranges = BTreeMap::new();
        for dimension in Dimension::ALL {
            let values = population.iter().map(|m| raw_value(dimension, m));
            let range = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            });
            if let Some(range) = range {
                ranges.insert(dimension, range);
            }
        }

        Self { ranges }
    }

    /// `(min, max)` for a dimension, if the population had any strategies.
    pub fn get(&self, dimension: Dimension) -> Option<(f64, f64)> {
        self.ranges.get(&dimension).copied()
    }

    /// Scale one strategy against these ranges.
    pub fn normalize(&self, metrics: &StrategyMetrics) -> NormalizedScores {
        Dimension::ALL
            .iter()
            .map(|&d| {
                let score = match self.get(d) {
                    Some((min, max)) => scale_to_range(raw_value(d, metrics), min, max),
                    None => NO_SIGNAL,
                };
                (d, score)
            })
            .collect()
    }
}

/// Scale one strategy against a baseline strategy's raw values.
fn normalize_against(metrics: &StrategyMetrics, baseline: &StrategyMetrics) -> NormalizedScores {
    Dimension::ALL
        .iter()
        .map(|&d| (d, scale_to_baseline(raw_value(d, metrics), raw_value(d, baseline))))
        .collect()
}

/// Normalized scores for one strategy.
///
/// With a baseline, scores are relative to that character's own averages;
/// without one, relative to the population in `all`.
pub fn compute_normalized_scores(
    metrics: &StrategyMetrics,
    all: &StrategyMetricsMap,
    baseline: Option<&CharacterBaseline>,
) -> NormalizedScores {
    match baseline {
        Some(baseline) => normalize_against(metrics, &baseline.metrics),
        None => DimensionRanges::from_population(all).normalize(metrics),
    }
}

/// Normalized scores for every strategy, computing population ranges once.
pub fn normalize_all(
    all: &StrategyMetricsMap,
    baseline: Option<&CharacterBaseline>,
) -> BTreeMap<String, NormalizedScores> {
    match baseline {
        Some(baseline) => all
            .iter()
            .map(|(name, m)| (name.clone(), normalize_against(m, &baseline.metrics)))
            .collect(),
        None => {
            let ranges = DimensionRanges::from_population(all);
            all.iter()
                .map(|(name, m)| (name.clone(), ranges.normalize(m)))
                .collect()
        }
    }
}
