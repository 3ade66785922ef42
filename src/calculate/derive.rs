//! Per-strategy metric derivation.
//!
//! Runs as explicit stages: accumulated totals are derived into per-AI
//! metrics, the global match total is taken from those, and only then are
//! usage rates filled in.

use std::collections::BTreeMap;

use tracing::debug;

use super::accumulate::accumulate;
use super::{
    average, calculate_combat_performance_score, calculate_damage_efficiency,
    calculate_data_quality, calculate_dps, calculate_hit_rate, calculate_usage_rate,
    calculate_win_rate, percentage,
};
use crate::models::{
    ActionProfile, BuildTypeUsage, CapsuleTotals, CapsuleUsage, CharacterAggregate,
    CharacterUsage, StatTotals, StrategyMetrics, StrategyMetricsMap, StrategyType, UsageTotals,
};

/// Per-AI metrics whose usage rates are not yet known.
#[derive(Debug)]
pub(crate) struct PerAiMetrics(pub Vec<StrategyMetrics>);

/// Totals across every derived strategy.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GlobalTotals {
    pub total_matches: u32,
}

impl GlobalTotals {
    pub fn from_metrics(metrics: &PerAiMetrics) -> Self {
        Self {
            total_matches: metrics.0.iter().map(|m| m.total_matches).sum(),
        }
    }
}

impl PerAiMetrics {
    /// Fill in usage rates against the global total.
    pub fn finalize(self, global: GlobalTotals) -> StrategyMetricsMap {
        self.0
            .into_iter()
            .map(|mut m| {
                m.usage_rate = calculate_usage_rate(m.total_matches, global.total_matches);
                (m.name.clone(), m)
            })
            .collect()
    }
}

/// Aggregate every AI strategy found in the characters' match histories.
pub fn compute_ai_strategy_metrics(characters: &[CharacterAggregate]) -> StrategyMetricsMap {
    let accumulation = accumulate(characters);

    let per_ai = PerAiMetrics(
        accumulation
            .ais
            .iter()
            .filter_map(|(name, ai)| derive_metrics(name, &ai.overall, &ai.characters))
            .collect(),
    );
    let global = GlobalTotals::from_metrics(&per_ai);
    let metrics = per_ai.finalize(global);

    debug!(
        "Derived metrics for {} strategies over {} matches",
        metrics.len(),
        global.total_matches
    );

    metrics
}

/// Derive one strategy's metrics from its accumulated totals.
///
/// Returns `None` when there are no completed matches. The usage rate is left
/// at zero; it needs the global total.
pub(crate) fn derive_metrics(
    name: &str,
    overall: &UsageTotals,
    characters: &BTreeMap<String, UsageTotals>,
) -> Option<StrategyMetrics> {
    let t = &overall.totals;
    let n = t.matches;
    if n == 0 {
        return None;
    }

    let avg_battle_time = average(t.battle_time, n, 1);
    // DPS divides by the unrounded mean
    let mean_battle_time = t.battle_time / n as f64;
    let avg_damage_dealt = average(t.damage_dealt, n, 0);
    let avg_damage_taken = average(t.damage_taken, n, 0);
    let win_rate = calculate_win_rate(t.wins, n);
    let survival_rate = percentage(t.survived as f64, n as f64);

    let character_usage = characters
        .iter()
        .filter(|(_, usage)| usage.totals.matches > 0)
        .map(|(character, usage)| {
            let matches = usage.totals.matches;
            let entry = CharacterUsage {
                matches,
                wins: usage.totals.wins,
                win_rate: calculate_win_rate(usage.totals.wins, matches),
                percentage: percentage(matches as f64, n as f64),
                totals: usage.clone(),
            };
            (character.clone(), entry)
        })
        .collect::<BTreeMap<_, _>>();

    Some(StrategyMetrics {
        name: name.to_string(),
        strategy_type: StrategyType::from_name(name),
        total_matches: n,
        win_count: t.wins,
        win_rate,
        usage_rate: 0.0,
        survival_rate,

        avg_battle_time,
        avg_damage_dealt,
        avg_damage_taken,
        avg_kills: average(t.kills, n, 1),
        avg_health_remaining: average(t.health_remaining, n, 0),
        avg_max_health: average(t.max_health, n, 0),
        avg_dps: calculate_dps(avg_damage_dealt, mean_battle_time),
        damage_efficiency: calculate_damage_efficiency(avg_damage_dealt, avg_damage_taken),
        combat_performance_score: calculate_combat_performance_score(
            avg_damage_dealt,
            avg_damage_taken,
            win_rate,
            survival_rate,
        ),

        avg_max_combo: average(t.max_combo, n, 1),
        avg_max_combo_damage: average(t.max_combo_damage, n, 0),
        avg_sparking_combo: average(t.sparking_combo, n, 1),

        avg_s1_blast: average(t.s1_blast, n, 1),
        avg_s2_blast: average(t.s2_blast, n, 1),
        avg_ult_blast: average(t.ult_blast, n, 1),
        avg_s1_hit_rate: calculate_hit_rate(t.s1_hits, t.s1_blast),
        avg_s2_hit_rate: calculate_hit_rate(t.s2_hits, t.s2_blast),
        avg_ult_hit_rate: calculate_hit_rate(t.ult_hits, t.ult_blast),

        avg_skill1: average(t.skill1, n, 1),
        avg_skill2: average(t.skill2, n, 1),
        avg_throws: average(t.throws, n, 1),
        avg_vanishing: average(t.vanishing, n, 1),
        avg_dragon_homing: average(t.dragon_homing, n, 1),
        avg_lightning: average(t.lightning, n, 1),
        avg_speed_impact: average(t.speed_impact, n, 1),
        speed_impact_win_rate: percentage(t.speed_impact_wins, t.speed_impact),
        avg_sparking: average(t.sparking, n, 1),
        avg_dragon_dash: average(t.dragon_dash, n, 0),
        avg_ki_blast: average(t.ki_blast, n, 1),
        avg_charge: average(t.charge, n, 1),
        avg_tags: average(t.tags, n, 1),

        avg_guard: average(t.guard, n, 1),
        avg_z_counter: average(t.z_counter, n, 1),
        avg_super_counter: average(t.super_counter, n, 1),
        avg_revenge_counter: average(t.revenge_counter, n, 1),

        avg_build_costs: overall.build_costs.averaged(n),
        actions: ActionProfile::from_totals(t),
        build_types: build_type_usage(&overall.build_types, n),
        capsules: capsule_usage(&overall.capsules, n),
        data_quality: calculate_data_quality(n, character_usage.len() as u32),
        character_usage,
        unfiltered: None,
    })
}

fn build_type_usage(buckets: &BTreeMap<String, StatTotals>, matches: u32) -> Vec<BuildTypeUsage> {
    let mut usage: Vec<BuildTypeUsage> = buckets
        .iter()
        .filter(|(_, t)| t.matches > 0)
        .map(|(label, t)| BuildTypeUsage {
            label: label.clone(),
            count: t.matches,
            percentage: percentage(t.matches as f64, matches as f64),
            win_rate: calculate_win_rate(t.wins, t.matches),
            action_averages: ActionProfile::from_totals(t),
        })
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    usage
}

fn capsule_usage(buckets: &BTreeMap<String, CapsuleTotals>, matches: u32) -> Vec<CapsuleUsage> {
    let mut usage: Vec<CapsuleUsage> = buckets
        .iter()
        .filter(|(_, c)| c.totals.matches > 0)
        .map(|(id, c)| CapsuleUsage {
            id: id.clone(),
            name: c.name.clone(),
            count: c.totals.matches,
            percentage: percentage(c.totals.matches as f64, matches as f64),
            win_rate: calculate_win_rate(c.totals.wins, c.totals.matches),
            action_averages: ActionProfile::from_totals(&c.totals),
        })
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id)));
    usage
}
