//! Behavioral impact: how a strategy's action averages, and those of its
//! build types and capsules, compare against a reference profile.

use serde::{Deserialize, Serialize};

use super::percent_difference;
use crate::models::{
    Action, ActionProfile, CharacterBaseline, StrategyMetrics, StrategyMetricsMap,
};

/// One action compared against its reference average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDelta {
    pub action: Action,
    pub label: String,
    pub value: f64,
    pub reference: f64,
    pub percent_diff: f64,
}

/// Action deltas for one build type or capsule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketImpact {
    pub name: String,
    pub count: u32,
    pub win_rate: f64,
    pub deltas: Vec<ActionDelta>,
}

/// The profile everything is compared against, fixed per analysis mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ImpactReference {
    /// Action frequency against the match-weighted population; build and
    /// capsule impact against the strategy's own overall profile.
    Population(ActionProfile),
    /// Everything against the character's own averages.
    Baseline(ActionProfile),
}

impl ImpactReference {
    pub fn for_mode(all: &StrategyMetricsMap, baseline: Option<&CharacterBaseline>) -> Self {
        match baseline {
            Some(baseline) => ImpactReference::Baseline(baseline.metrics.actions.clone()),
            None => ImpactReference::Population(population_profile(all)),
        }
    }

    fn frequency(&self) -> &ActionProfile {
        match self {
            ImpactReference::Population(profile) | ImpactReference::Baseline(profile) => profile,
        }
    }

    fn bucket<'a>(&'a self, metrics: &'a StrategyMetrics) -> &'a ActionProfile {
        match self {
            ImpactReference::Population(_) => &metrics.actions,
            ImpactReference::Baseline(profile) => profile,
        }
    }
}

/// Action averages across every strategy, weighted by match count.
pub fn population_profile(all: &StrategyMetricsMap) -> ActionProfile {
    ActionProfile::weighted_mean(all.values().map(|m| (&m.actions, m.total_matches)))
}

fn deltas(profile: &ActionProfile, reference: &ActionProfile) -> Vec<ActionDelta> {
    Action::ALL
        .iter()
        .map(|&action| {
            let value = profile.get(action);
            let reference = reference.get(action);
            ActionDelta {
                action,
                label: action.label().to_string(),
                value,
                reference,
                percent_diff: percent_difference(value, reference),
            }
        })
        .collect()
}

/// The strategy's action averages against the reference.
pub fn action_frequency(
    metrics: &StrategyMetrics,
    reference: &ImpactReference,
) -> Vec<ActionDelta> {
    deltas(&metrics.actions, reference.frequency())
}

/// Per build type, in usage order.
pub fn build_impact(metrics: &StrategyMetrics, reference: &ImpactReference) -> Vec<BucketImpact> {
    let against = reference.bucket(metrics);
    metrics
        .build_types
        .iter()
        .map(|b| BucketImpact {
            name: b.label.clone(),
            count: b.count,
            win_rate: b.win_rate,
            deltas: deltas(&b.action_averages, against),
        })
        .collect()
}

/// Per equipped capsule, in usage order.
pub fn capsule_impact(metrics: &StrategyMetrics, reference: &ImpactReference) -> Vec<BucketImpact> {
    let against = reference.bucket(metrics);
    metrics
        .capsules
        .iter()
        .map(|c| BucketImpact {
            name: c.name.clone(),
            count: c.count,
            win_rate: c.win_rate,
            deltas: deltas(&c.action_averages, against),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::fixtures::{combined, completed, repeated};
    use crate::calculate::{compute_ai_strategy_metrics, compute_character_baseline};
    use crate::models::{BuildComposition, MatchRecord};

    fn delta(deltas: &[ActionDelta], action: Action) -> &ActionDelta {
        deltas
            .iter()
            .find(|d| d.action == action)
            .unwrap_or_else(|| panic!("no delta for {:?}", action))
    }

    fn throwing(ai: &str, throws: f64, build: &str) -> MatchRecord {
        MatchRecord {
            throw_count: throws,
            build_composition: Some(BuildComposition {
                label: Some(build.to_string()),
                breakdown: vec![],
            }),
            ..completed(ai)
        }
    }

    fn metrics() -> StrategyMetricsMap {
        compute_ai_strategy_metrics(&[
            combined(
                "Goku",
                vec![
                    repeated("Goku", throwing("Attack Strategy", 6.0, "Melee Focus"), 1),
                    repeated("Goku", throwing("Attack Strategy", 2.0, "Blast Focus"), 1),
                ],
            ),
            repeated("Vegeta", throwing("Defense Strategy", 1.0, "Melee Focus"), 2),
        ])
    }

    #[test]
    fn test_population_profile_is_match_weighted() {
        let all = metrics();
        // (2 × 4 + 2 × 1) / 4
        assert_eq!(population_profile(&all).get(Action::Throws), 2.5);
    }

    #[test]
    fn test_action_frequency_against_population() {
        let all = metrics();
        let reference = ImpactReference::for_mode(&all, None);
        let frequency = action_frequency(&all["Attack Strategy"], &reference);

        assert_eq!(frequency.len(), Action::ALL.len());
        let throws = delta(&frequency, Action::Throws);
        assert_eq!(throws.value, 4.0);
        assert_eq!(throws.reference, 2.5);
        assert_eq!(throws.percent_diff, 60.0);
        assert_eq!(throws.label, Action::Throws.label());

        // Nothing on either side
        assert_eq!(delta(&frequency, Action::Guard).percent_diff, 0.0);
    }

    #[test]
    fn test_build_impact_against_own_profile() {
        let all = metrics();
        let reference = ImpactReference::for_mode(&all, None);
        let builds = build_impact(&all["Attack Strategy"], &reference);

        assert_eq!(builds.len(), 2);
        // Equal counts: label order
        assert_eq!(builds[0].name, "Blast Focus");
        assert_eq!(delta(&builds[0].deltas, Action::Throws).percent_diff, -50.0);
        assert_eq!(builds[1].name, "Melee Focus");
        assert_eq!(delta(&builds[1].deltas, Action::Throws).percent_diff, 50.0);
    }

    #[test]
    fn test_baseline_mode_uses_baseline_for_everything() {
        let all = metrics();
        let baseline = compute_character_baseline(&all, "Goku");
        let reference = ImpactReference::for_mode(&all, baseline.as_ref());
        let attack = &all["Attack Strategy"];

        assert_eq!(
            delta(&action_frequency(attack, &reference), Action::Throws).percent_diff,
            0.0
        );
        let builds = build_impact(attack, &reference);
        assert_eq!(delta(&builds[1].deltas, Action::Throws).reference, 4.0);
        assert!(capsule_impact(attack, &reference).is_empty());
    }

    #[test]
    fn test_zero_reference() {
        let all = compute_ai_strategy_metrics(&[repeated(
            "Goku",
            MatchRecord {
                guard_count: 2.0,
                ..completed("Defense Strategy")
            },
            1,
        )]);
        let reference = ImpactReference::Population(ActionProfile::default());
        let frequency = action_frequency(&all["Defense Strategy"], &reference);

        assert_eq!(delta(&frequency, Action::Guard).percent_diff, 100.0);
        assert_eq!(delta(&frequency, Action::Throws).percent_diff, 0.0);
    }
}
