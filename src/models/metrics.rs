//! Derived per-strategy metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ActionProfile, BuildCosts, DataQuality, StrategyType, UsageTotals};

/// Metrics for every AI strategy, keyed by strategy name.
pub type StrategyMetricsMap = BTreeMap<String, StrategyMetrics>;

/// Usage of one build type by an AI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildTypeUsage {
    pub label: String,
    pub count: u32,
    /// Share of the strategy's matches (0 to 100)
    pub percentage: f64,
    pub win_rate: f64,
    /// Per-match action averages within this build type only
    pub action_averages: ActionProfile,
}

/// Usage of one capsule by an AI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapsuleUsage {
    pub id: String,
    pub name: String,
    pub count: u32,
    pub percentage: f64,
    pub win_rate: f64,
    pub action_averages: ActionProfile,
}

/// One character's contribution to an AI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterUsage {
    pub matches: u32,
    pub wins: u32,
    pub win_rate: f64,
    /// Share of the strategy's matches (0 to 100)
    pub percentage: f64,
    /// Raw sums, kept so metrics can be re-aggregated per character
    pub totals: UsageTotals,
}

/// Headline values from before a character filter was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnfilteredSnapshot {
    pub total_matches: u32,
    pub win_rate: f64,
    pub usage_rate: f64,
    pub avg_damage_dealt: f64,
    pub damage_efficiency: f64,
    pub combat_performance_score: f64,
    pub unique_characters: u32,
}

/// Aggregated statistics for one AI strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyMetrics {
    /// AI strategy name
    pub name: String,

    #[serde(rename = "type")]
    pub strategy_type: StrategyType,

    /// Completed matches (battle time > 0)
    pub total_matches: u32,
    pub win_count: u32,
    pub win_rate: f64,
    /// Share of all completed matches (0 to 100)
    pub usage_rate: f64,
    pub survival_rate: f64,

    // Combat
    pub avg_battle_time: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
    pub avg_kills: f64,
    pub avg_health_remaining: f64,
    pub avg_max_health: f64,
    pub avg_dps: f64,
    pub damage_efficiency: f64,
    pub combat_performance_score: f64,

    // Combos
    pub avg_max_combo: f64,
    pub avg_max_combo_damage: f64,
    pub avg_sparking_combo: f64,

    // Blasts
    pub avg_s1_blast: f64,
    pub avg_s2_blast: f64,
    pub avg_ult_blast: f64,
    pub avg_s1_hit_rate: f64,
    pub avg_s2_hit_rate: f64,
    pub avg_ult_hit_rate: f64,

    // Skills and tactics
    pub avg_skill1: f64,
    pub avg_skill2: f64,
    pub avg_throws: f64,
    pub avg_vanishing: f64,
    pub avg_dragon_homing: f64,
    pub avg_lightning: f64,
    pub avg_speed_impact: f64,
    pub speed_impact_win_rate: f64,
    pub avg_sparking: f64,
    pub avg_dragon_dash: f64,
    pub avg_ki_blast: f64,
    pub avg_charge: f64,
    pub avg_tags: f64,

    // Defense
    pub avg_guard: f64,
    pub avg_z_counter: f64,
    pub avg_super_counter: f64,
    pub avg_revenge_counter: f64,

    /// Average build cost per category
    pub avg_build_costs: BuildCosts,

    /// Overall per-match action averages
    pub actions: ActionProfile,

    /// Sorted by count, most used first
    pub build_types: Vec<BuildTypeUsage>,
    pub capsules: Vec<CapsuleUsage>,

    /// Keyed by character name
    pub character_usage: BTreeMap<String, CharacterUsage>,

    pub data_quality: DataQuality,

    /// Present only on character-filtered metrics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unfiltered: Option<UnfilteredSnapshot>,
}

impl StrategyMetrics {
    /// Number of distinct characters that played against this strategy.
    pub fn unique_characters(&self) -> u32 {
        self.character_usage.len() as u32
    }

    /// Headline values, for shadowing once a filter replaces them.
    pub fn snapshot(&self) -> UnfilteredSnapshot {
        UnfilteredSnapshot {
            total_matches: self.total_matches,
            win_rate: self.win_rate,
            usage_rate: self.usage_rate,
            avg_damage_dealt: self.avg_damage_dealt,
            damage_efficiency: self.damage_efficiency,
            combat_performance_score: self.combat_performance_score,
            unique_characters: self.unique_characters(),
        }
    }

    /// Characters sorted by match count, most used first.
    pub fn top_characters(&self, limit: usize) -> Vec<(&str, &CharacterUsage)> {
        let mut sorted: Vec<_> = self
            .character_usage
            .iter()
            .map(|(name, usage)| (name.as_str(), usage))
            .collect();
        sorted.sort_by(|a, b| b.1.matches.cmp(&a.1.matches).then_with(|| a.0.cmp(b.0)));
        sorted.truncate(limit);
        sorted
    }
}

/// A character's own averages across every AI strategy it faced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterBaseline {
    pub character: String,

    /// Number of AI strategies the character was paired with
    pub strategies_faced: u32,

    pub metrics: StrategyMetrics,
}
