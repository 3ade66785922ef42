//! Running sums accumulated from match records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BuildCost, MatchRecord};

/// Sums of every tracked counter over a set of completed matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTotals {
    pub matches: u32,
    pub wins: u32,
    /// Matches finished with health remaining
    pub survived: u32,

    pub battle_time: f64,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub kills: f64,
    pub health_remaining: f64,
    pub max_health: f64,

    pub max_combo: f64,
    pub max_combo_damage: f64,
    pub sparking_combo: f64,

    pub s1_blast: f64,
    pub s1_hits: f64,
    pub s2_blast: f64,
    pub s2_hits: f64,
    pub ult_blast: f64,
    pub ult_hits: f64,

    pub skill1: f64,
    pub skill2: f64,
    pub throws: f64,
    pub vanishing: f64,
    pub dragon_homing: f64,
    pub lightning: f64,
    pub speed_impact: f64,
    pub speed_impact_wins: f64,

    pub guard: f64,
    pub z_counter: f64,
    pub super_counter: f64,
    pub revenge_counter: f64,

    pub sparking: f64,
    pub dragon_dash: f64,
    pub ki_blast: f64,
    pub charge: f64,
    pub tags: f64,
}

impl StatTotals {
    /// Add one completed match.
    pub fn record(&mut self, m: &MatchRecord) {
        self.matches += 1;
        if m.won {
            self.wins += 1;
        }
        if m.survived() {
            self.survived += 1;
        }

        self.battle_time += m.battle_time;
        self.damage_dealt += m.damage_done;
        self.damage_taken += m.damage_taken;
        self.kills += m.kills;
        self.health_remaining += m.hp_gauge_value;
        self.max_health += m.hp_gauge_value_max;

        self.max_combo += m.max_combo_num;
        self.max_combo_damage += m.max_combo_damage;
        self.sparking_combo += m.sparking_combo_count;

        self.s1_blast += m.s1_blast;
        self.s1_hits += m.s1_hit_blast;
        self.s2_blast += m.s2_blast;
        self.s2_hits += m.s2_hit_blast;
        self.ult_blast += m.ult_blast;
        self.ult_hits += m.ult_hit_blast;

        self.skill1 += m.exa1_count;
        self.skill2 += m.exa2_count;
        self.throws += m.throw_count;
        self.vanishing += m.vanishing_attack_count;
        self.dragon_homing += m.dragon_homing_count;
        self.lightning += m.lightning_attack_count;
        self.speed_impact += m.speed_impact_count;
        self.speed_impact_wins += m.speed_impact_wins;

        self.guard += m.guard_count;
        self.z_counter += m.z_counter_count;
        self.super_counter += m.super_counter_count;
        self.revenge_counter += m.revenge_counter_count;

        self.sparking += m.sparking_count;
        self.dragon_dash += m.dragon_dash_mileage;
        self.ki_blast += m.shot_energy_bullet_count;
        self.charge += m.charge_count;
        self.tags += m.tags;
    }

    /// Fold another set of totals into this one.
    pub fn merge(&mut self, other: &StatTotals) {
        self.matches += other.matches;
        self.wins += other.wins;
        self.survived += other.survived;

        self.battle_time += other.battle_time;
        self.damage_dealt += other.damage_dealt;
        self.damage_taken += other.damage_taken;
        self.kills += other.kills;
        self.health_remaining += other.health_remaining;
        self.max_health += other.max_health;

        self.max_combo += other.max_combo;
        self.max_combo_damage += other.max_combo_damage;
        self.sparking_combo += other.sparking_combo;

        self.s1_blast += other.s1_blast;
        self.s1_hits += other.s1_hits;
        self.s2_blast += other.s2_blast;
        self.s2_hits += other.s2_hits;
        self.ult_blast += other.ult_blast;
        self.ult_hits += other.ult_hits;

        self.skill1 += other.skill1;
        self.skill2 += other.skill2;
        self.throws += other.throws;
        self.vanishing += other.vanishing;
        self.dragon_homing += other.dragon_homing;
        self.lightning += other.lightning;
        self.speed_impact += other.speed_impact;
        self.speed_impact_wins += other.speed_impact_wins;

        self.guard += other.guard;
        self.z_counter += other.z_counter;
        self.super_counter += other.super_counter;
        self.revenge_counter += other.revenge_counter;

        self.sparking += other.sparking;
        self.dragon_dash += other.dragon_dash;
        self.ki_blast += other.ki_blast;
        self.charge += other.charge;
        self.tags += other.tags;
    }
}

/// Build cost per category. Holds sums while accumulating, averages once derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildCosts {
    pub melee: f64,
    pub blast: f64,
    pub ki_blast: f64,
    pub defense: f64,
    pub skill: f64,
    pub ki_efficiency: f64,
    pub utility: f64,
}

impl BuildCosts {
    /// Add a build's cost breakdown. Unrecognised categories are ignored.
    pub fn record(&mut self, breakdown: &[BuildCost]) {
        for entry in breakdown {
            let slot = match entry.name.trim() {
                "Melee" => &mut self.melee,
                "Blast" => &mut self.blast,
                "Ki Blast" => &mut self.ki_blast,
                "Defense" => &mut self.defense,
                "Skill" => &mut self.skill,
                "Ki Efficiency" => &mut self.ki_efficiency,
                "Utility" => &mut self.utility,
                _ => continue,
            };
            *slot += entry.cost;
        }
    }

    pub fn merge(&mut self, other: &BuildCosts) {
        self.melee += other.melee;
        self.blast += other.blast;
        self.ki_blast += other.ki_blast;
        self.defense += other.defense;
        self.skill += other.skill;
        self.ki_efficiency += other.ki_efficiency;
        self.utility += other.utility;
    }

    /// Per-match averages, rounded to one decimal.
    pub fn averaged(&self, matches: u32) -> BuildCosts {
        let avg = |total: f64| crate::calculate::average(total, matches, 1);
        BuildCosts {
            melee: avg(self.melee),
            blast: avg(self.blast),
            ki_blast: avg(self.ki_blast),
            defense: avg(self.defense),
            skill: avg(self.skill),
            ki_efficiency: avg(self.ki_efficiency),
            utility: avg(self.utility),
        }
    }
}

/// Totals for one equipped capsule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapsuleTotals {
    pub name: String,
    pub totals: StatTotals,
}

/// Everything accumulated for one AI, or one (AI, character) pairing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageTotals {
    pub totals: StatTotals,
    pub build_costs: BuildCosts,
    /// Keyed by build type label
    pub build_types: BTreeMap<String, StatTotals>,
    /// Keyed by capsule id
    pub capsules: BTreeMap<String, CapsuleTotals>,
}

impl UsageTotals {
    /// Add one completed match, including its build and capsule buckets.
    pub fn record(&mut self, m: &MatchRecord) {
        self.totals.record(m);
        self.build_costs.record(m.build_breakdown());

        if let Some(label) = m.build_label() {
            self.build_types
                .entry(label.to_string())
                .or_default()
                .record(m);
        }

        for capsule in m.equipped_capsules.iter().filter(|c| !c.id.is_empty()) {
            let bucket = self.capsules.entry(capsule.id.clone()).or_default();
            if bucket.name.is_empty() {
                bucket.name = capsule.name.clone().unwrap_or_else(|| capsule.id.clone());
            }
            bucket.totals.record(m);
        }
    }

    pub fn merge(&mut self, other: &UsageTotals) {
        self.totals.merge(&other.totals);
        self.build_costs.merge(&other.build_costs);

        for (label, totals) in &other.build_types {
            self.build_types
                .entry(label.clone())
                .or_default()
                .merge(totals);
        }

        for (id, capsule) in &other.capsules {
            let bucket = self.capsules.entry(id.clone()).or_default();
            if bucket.name.is_empty() {
                bucket.name = capsule.name.clone();
            }
            bucket.totals.merge(&capsule.totals);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuildComposition, Capsule};

    fn sample_match() -> MatchRecord {
        MatchRecord {
            won: true,
            battle_time: 90.0,
            damage_done: 30000.0,
            damage_taken: 12000.0,
            hp_gauge_value: 5000.0,
            s1_blast: 2.0,
            s1_hit_blast: 1.0,
            throw_count: 3.0,
            build_composition: Some(BuildComposition {
                label: Some("Melee Focus".to_string()),
                breakdown: vec![
                    BuildCost {
                        name: "Melee".to_string(),
                        cost: 4.0,
                    },
                    BuildCost {
                        name: "Ki Efficiency".to_string(),
                        cost: 2.0,
                    },
                    BuildCost {
                        name: "Mystery".to_string(),
                        cost: 9.0,
                    },
                ],
            }),
            equipped_capsules: vec![
                Capsule {
                    id: "cap-1".to_string(),
                    name: Some("Super Senzu".to_string()),
                },
                Capsule {
                    id: String::new(),
                    name: None,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_stat_totals_record() {
        let mut totals = StatTotals::default();
        totals.record(&sample_match());
        totals.record(&MatchRecord {
            battle_time: 30.0,
            ..Default::default()
        });

        assert_eq!(totals.matches, 2);
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.survived, 1);
        assert_eq!(totals.battle_time, 120.0);
        assert_eq!(totals.s1_hits, 1.0);
        assert_eq!(totals.throws, 3.0);
    }

    #[test]
    fn test_build_costs_record_and_average() {
        let mut costs = BuildCosts::default();
        costs.record(sample_match().build_breakdown());
        costs.record(sample_match().build_breakdown());

        assert_eq!(costs.melee, 8.0);
        assert_eq!(costs.ki_efficiency, 4.0);
        assert_eq!(costs.utility, 0.0);

        let avg = costs.averaged(3);
        assert_eq!(avg.melee, 2.7);
        assert_eq!(avg.ki_efficiency, 1.3);
    }

    #[test]
    fn test_usage_totals_buckets() {
        let mut usage = UsageTotals::default();
        usage.record(&sample_match());
        usage.record(&sample_match());

        assert_eq!(usage.totals.matches, 2);
        assert_eq!(usage.build_types["Melee Focus"].matches, 2);
        assert_eq!(usage.capsules.len(), 1);
        assert_eq!(usage.capsules["cap-1"].name, "Super Senzu");
        assert_eq!(usage.capsules["cap-1"].totals.wins, 2);
    }

    #[test]
    fn test_usage_totals_merge() {
        let mut a = UsageTotals::default();
        a.record(&sample_match());
        let mut b = UsageTotals::default();
        b.record(&sample_match());
        b.record(&MatchRecord {
            battle_time: 50.0,
            ..Default::default()
        });

        a.merge(&b);

        assert_eq!(a.totals.matches, 3);
        assert_eq!(a.totals.wins, 2);
        assert_eq!(a.build_types["Melee Focus"].matches, 2);
        assert_eq!(a.capsules["cap-1"].totals.matches, 2);
        assert_eq!(a.build_costs.melee, 8.0);
    }
}
