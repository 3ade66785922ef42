//! Statistics calculation engine.
//!
//! Turns raw match records into per-strategy insight:
//! - Stat accumulation per AI strategy and per (strategy, character)
//! - Per-match averages, rates and composite scores
//! - Normalization against the AI population or a character baseline
//! - Playstyle archetype detection
//! - Character-filtered re-aggregation
//! - Action, build and capsule impact against a reference profile

mod accumulate;
mod classify;
mod derive;
mod filter;
mod impact;
mod normalize;

#[cfg(test)]
pub(crate) mod fixtures;

pub use classify::{
    detect_playstyle_archetype, score_primary_archetypes, ArchetypeDef, Criterion, MatchStrategy,
    Threshold, PRIMARY_ARCHETYPES, SUB_TYPE_ARCHETYPES,
};
pub use derive::compute_ai_strategy_metrics;
pub use filter::{compute_character_baseline, filter_metrics_by_character};
pub use impact::{
    action_frequency, build_impact, capsule_impact, population_profile, ActionDelta,
    BucketImpact, ImpactReference,
};
pub use normalize::{compute_normalized_scores, normalize_all, DimensionRanges};

use crate::models::{Confidence, DataQuality};

/// Roster size used to judge character coverage.
pub const CHARACTER_UNIVERSE: f64 = 200.0;

/// Battle length assumed when DPS has to be estimated without a battle time.
pub const FALLBACK_BATTLE_SECONDS: f64 = 120.0;

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Per-match average, rounded.
pub fn average(total: f64, matches: u32, decimals: i32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        round_to(total / matches as f64, decimals)
    }
}

/// `part / whole` as a percentage with one decimal.
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round_to(part / whole * 100.0, 1)
    } else {
        0.0
    }
}

/// Calculate win rate (0 to 100) from wins and matches.
pub fn calculate_win_rate(wins: u32, matches: u32) -> f64 {
    percentage(wins as f64, matches as f64)
}

/// Hits per attempt (0 to 100); not divided by match count.
pub fn calculate_hit_rate(hits: f64, attempts: f64) -> f64 {
    percentage(hits, attempts)
}

/// Damage dealt per damage taken.
/// Without damage taken, dealt damage is scaled down by 1000 instead.
pub fn calculate_damage_efficiency(avg_dealt: f64, avg_taken: f64) -> f64 {
    if avg_taken > 0.0 {
        round_to(avg_dealt / avg_taken, 2)
    } else if avg_dealt > 0.0 {
        round_to(avg_dealt / 1000.0, 2)
    } else {
        0.0
    }
}

/// Damage per second. Falls back to a 120-second battle estimate when no
/// battle time was recorded; the fallback is an approximation.
pub fn calculate_dps(avg_dealt: f64, avg_battle_time: f64) -> f64 {
    if avg_battle_time > 0.0 {
        round_to(avg_dealt / avg_battle_time, 1)
    } else if avg_dealt > 0.0 {
        round_to(avg_dealt / FALLBACK_BATTLE_SECONDS, 1)
    } else {
        0.0
    }
}

/// Composite combat score (0 to 100).
///
/// `damage_ratio × 30 + win_rate × 0.5 + survival_rate × 0.2`, where the
/// damage ratio is 1 when no damage was taken.
pub fn calculate_combat_performance_score(
    avg_dealt: f64,
    avg_taken: f64,
    win_rate: f64,
    survival_rate: f64,
) -> f64 {
    let damage_ratio = if avg_taken > 0.0 {
        avg_dealt / avg_taken
    } else {
        1.0
    };

    let raw = damage_ratio * 30.0 + win_rate * 0.5 + survival_rate * 0.2;
    round_to(raw, 1).min(100.0)
}

/// Character coverage relative to sample size (0 to 1).
pub fn calculate_diversity_score(matches: u32, unique_characters: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }

    let coverage = unique_characters as f64 / CHARACTER_UNIVERSE;
    let sample = (matches as f64 / CHARACTER_UNIVERSE).min(1.0);
    (coverage / sample.sqrt()).min(1.0)
}

/// Sample quality for a strategy's metrics.
pub fn calculate_data_quality(matches: u32, unique_characters: u32) -> DataQuality {
    let diversity = calculate_diversity_score(matches, unique_characters);

    DataQuality {
        confidence: Confidence::from_sample(matches, diversity),
        diversity_score: round_to(diversity, 3),
        sample_size: matches,
        unique_characters,
    }
}

/// Usage share (0 to 100) of a strategy across all matches.
pub fn calculate_usage_rate(matches: u32, total_matches: u32) -> f64 {
    percentage(matches as f64, total_matches as f64)
}

/// Percent difference of `value` from `reference`.
/// A zero reference reports 100 for any positive value.
pub fn percent_difference(value: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        round_to((value - reference) / reference * 100.0, 1)
    } else if value > 0.0 {
        100.0
    } else {
        0.0
    }
}
