//! Playstyle archetype detection.
//!
//! Every archetype is an entry in a fixed catalogue carrying its own
//! [`MatchStrategy`]. The classifier evaluates the whole catalogue against a
//! strategy's normalized scores and ranks the results.

use std::cmp::Ordering;

use super::round_to;
use crate::models::{ArchetypeMatch, ArchetypeProfile, Dimension, NormalizedScores};

/// Sub-types and secondaries need at least this score.
pub const QUALIFYING_SCORE: f64 = 60.0;

/// A secondary archetype must be within this many points of the primary.
pub const SECONDARY_MAX_GAP: f64 = 15.0;

/// Bonus for reaching a threshold's ideal value.
const IDEAL_BONUS: f64 = 20.0;

/// Minimum and ideal normalized score for one criterion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    pub min: f64,
    pub ideal: f64,
}

impl Threshold {
    pub const fn new(min: f64, ideal: f64) -> Self {
        Self { min, ideal }
    }

    pub fn is_met(&self, value: f64) -> bool {
        value >= self.min
    }

    /// `weight` if met (plus the ideal bonus), otherwise proportional credit
    /// of `value / min × partial_weight`.
    fn credit(&self, value: f64, weight: f64, partial_weight: f64) -> f64 {
        if self.is_met(value) {
            if value >= self.ideal {
                weight + IDEAL_BONUS
            } else {
                weight
            }
        } else if self.min > 0.0 {
            value / self.min * partial_weight
        } else {
            0.0
        }
    }

    /// Standard criterion credit: 100 if met, partial credit ×50 otherwise.
    fn standard(&self, value: f64) -> f64 {
        self.credit(value, 100.0, 50.0)
    }

    /// Same threshold with its minimum relaxed by `factor`.
    fn relaxed(&self, factor: f64) -> Threshold {
        Threshold::new(self.min * factor, self.ideal)
    }
}

/// A threshold applied to one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criterion {
    pub dimension: Dimension,
    pub threshold: Threshold,
}

const fn criterion(dimension: Dimension, min: f64, ideal: f64) -> Criterion {
    Criterion {
        dimension,
        threshold: Threshold::new(min, ideal),
    }
}

/// How an archetype is scored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchStrategy {
    /// Independent min/ideal checks, one criterion each.
    Standard { criteria: &'static [Criterion] },

    /// Pass/fail caps on blast usage plus standard checks on melee indicators.
    MeleeGate {
        caps: &'static [(Dimension, f64)],
        indicators: &'static [Criterion],
    },

    /// The average of a pair weighted at 150 (partial credit ×75), plus a
    /// flat +50 for each supporting criterion met.
    BlastCombined {
        pair: (Dimension, Dimension),
        threshold: Threshold,
        support: &'static [Criterion],
    },

    /// The average of two related scores against one threshold.
    Combined {
        pair: (Dimension, Dimension),
        threshold: Threshold,
    },

    /// Needs two of three core indicators. A met supporting criterion relaxes
    /// the core threshold by 10%; fewer than two met halves the score.
    Rushdown {
        core: [Dimension; 3],
        threshold: Threshold,
        support: Criterion,
    },

    /// Needs one of two core indicators, else the score is halved. A met
    /// supporting criterion adds a flat bonus.
    Combo {
        core: [Dimension; 2],
        threshold: Threshold,
        support: Criterion,
    },
}

/// Raw result of evaluating one archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MatchScore {
    total: f64,
    criteria: u32,
    bonus: f64,
}

impl MatchScore {
    fn new(total: f64, criteria: u32) -> Self {
        Self {
            total,
            criteria,
            bonus: 0.0,
        }
    }

    /// `total / criteria + bonus`, clamped to [0, 100].
    fn finish(&self) -> f64 {
        if self.criteria == 0 {
            return 0.0;
        }
        let score = self.total / self.criteria as f64 + self.bonus;
        round_to(score.clamp(0.0, 100.0), 1)
    }
}

impl MatchStrategy {
    fn evaluate(&self, scores: &NormalizedScores) -> MatchScore {
        match *self {
            MatchStrategy::Standard { criteria } => {
                let total = criteria
                    .iter()
                    .map(|c| c.threshold.standard(scores.get(c.dimension)))
                    .sum();
                MatchScore::new(total, criteria.len() as u32)
            }

            MatchStrategy::MeleeGate { caps, indicators } => {
                let capped: f64 = caps
                    .iter()
                    .map(|&(d, max)| if scores.get(d) <= max { 100.0 } else { 0.0 })
                    .sum();
                let melee: f64 = indicators
                    .iter()
                    .map(|c| c.threshold.standard(scores.get(c.dimension)))
                    .sum();
                MatchScore::new(capped + melee, (caps.len() + indicators.len()) as u32)
            }

            MatchStrategy::BlastCombined {
                pair,
                threshold,
                support,
            } => {
                let combined = (scores.get(pair.0) + scores.get(pair.1)) / 2.0;
                let supporting = support
                    .iter()
                    .filter(|c| c.threshold.is_met(scores.get(c.dimension)))
                    .count() as f64
                    * 50.0;
                MatchScore::new(threshold.credit(combined, 150.0, 75.0) + supporting, 2)
            }

            MatchStrategy::Combined { pair, threshold } => {
                let combined = (scores.get(pair.0) + scores.get(pair.1)) / 2.0;
                MatchScore::new(threshold.standard(combined), 1)
            }

            MatchStrategy::Rushdown {
                core,
                threshold,
                support,
            } => {
                let threshold = if support.threshold.is_met(scores.get(support.dimension)) {
                    threshold.relaxed(0.9)
                } else {
                    threshold
                };
                let met = core
                    .iter()
                    .filter(|&&d| threshold.is_met(scores.get(d)))
                    .count();
                let total: f64 = core.iter().map(|&d| threshold.standard(scores.get(d))).sum();
                let total = if met < 2 { total / 2.0 } else { total };
                MatchScore::new(total, core.len() as u32)
            }

            MatchStrategy::Combo {
                core,
                threshold,
                support,
            } => {
                let met = core
                    .iter()
                    .filter(|&&d| threshold.is_met(scores.get(d)))
                    .count();
                let total: f64 = core.iter().map(|&d| threshold.standard(scores.get(d))).sum();
                let total = if met == 0 { total / 2.0 } else { total };
                let mut score = MatchScore::new(total, core.len() as u32);
                if support.threshold.is_met(scores.get(support.dimension)) {
                    score.bonus = IDEAL_BONUS;
                }
                score
            }
        }
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeDef {
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub strategy: MatchStrategy,
}

impl ArchetypeDef {
    fn evaluate(&self, scores: &NormalizedScores) -> ArchetypeMatch {
        ArchetypeMatch {
            name: self.name.to_string(),
            score: self.strategy.evaluate(scores).finish(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            color: self.color.to_string(),
        }
    }
}

/// Primary playstyles, in tie-break order.
pub const PRIMARY_ARCHETYPES: [ArchetypeDef; 4] = [
    ArchetypeDef {
        name: "Melee Fighter",
        description: "Stays in close range, avoiding blasts in favour of throws and rush attacks",
        icon: "👊",
        color: "#e74c3c",
        strategy: MatchStrategy::MeleeGate {
            caps: &[
                (Dimension::S1Blast, 40.0),
                (Dimension::S2Blast, 40.0),
                (Dimension::UltBlast, 40.0),
            ],
            indicators: &[
                criterion(Dimension::Throws, 50.0, 70.0),
                criterion(Dimension::Vanishing, 50.0, 70.0),
                criterion(Dimension::DragonHoming, 50.0, 70.0),
                criterion(Dimension::Lightning, 50.0, 70.0),
            ],
        },
    },
    ArchetypeDef {
        name: "Blast Spammer",
        description: "Leans on super blasts, charging ki to fire them again",
        icon: "💥",
        color: "#f39c12",
        strategy: MatchStrategy::BlastCombined {
            pair: (Dimension::S1Blast, Dimension::S2Blast),
            threshold: Threshold::new(60.0, 80.0),
            support: &[
                criterion(Dimension::Charge, 50.0, 70.0),
                criterion(Dimension::UltBlast, 50.0, 70.0),
            ],
        },
    },
    ArchetypeDef {
        name: "Ultimate Specialist",
        description: "Builds every exchange towards landing an ultimate",
        icon: "🌟",
        color: "#9b59b6",
        strategy: MatchStrategy::Standard {
            criteria: &[
                criterion(Dimension::UltBlast, 60.0, 80.0),
                criterion(Dimension::Offense, 50.0, 70.0),
            ],
        },
    },
    ArchetypeDef {
        name: "Defensive Fighter",
        description: "Guards and counters, waiting for the opponent to overcommit",
        icon: "🛡️",
        color: "#3498db",
        strategy: MatchStrategy::Standard {
            criteria: &[
                criterion(Dimension::Defense, 60.0, 80.0),
                criterion(Dimension::Guard, 50.0, 70.0),
                criterion(Dimension::SuperCounter, 40.0, 60.0),
            ],
        },
    },
];

/// Secondary tags; any number may apply.
pub const SUB_TYPE_ARCHETYPES: [ArchetypeDef; 6] = [
    ArchetypeDef {
        name: "Skill User",
        description: "Spends skill count freely on both skills",
        icon: "✨",
        color: "#1abc9c",
        strategy: MatchStrategy::Combined {
            pair: (Dimension::Skill1, Dimension::Skill2),
            threshold: Threshold::new(60.0, 80.0),
        },
    },
    ArchetypeDef {
        name: "Rushdown Fighter",
        description: "Closes distance fast and keeps up relentless pressure",
        icon: "⚡",
        color: "#e67e22",
        strategy: MatchStrategy::Rushdown {
            core: [Dimension::Aggression, Dimension::Vanishing, Dimension::Lightning],
            threshold: Threshold::new(60.0, 80.0),
            support: criterion(Dimension::DragonDash, 50.0, 70.0),
        },
    },
    ArchetypeDef {
        name: "Grappler",
        description: "Breaks guards with frequent throws",
        icon: "🤼",
        color: "#8e44ad",
        strategy: MatchStrategy::Standard {
            criteria: &[criterion(Dimension::Throws, 60.0, 80.0)],
        },
    },
    ArchetypeDef {
        name: "Sparking User",
        description: "Activates Sparking! mode often",
        icon: "🔥",
        color: "#c0392b",
        strategy: MatchStrategy::Standard {
            criteria: &[criterion(Dimension::Sparking, 60.0, 80.0)],
        },
    },
    ArchetypeDef {
        name: "Combo Fighter",
        description: "Extends strings into long, damaging combos",
        icon: "🔗",
        color: "#16a085",
        strategy: MatchStrategy::Combo {
            core: [Dimension::ComboFocus, Dimension::MaxCombo],
            threshold: Threshold::new(60.0, 80.0),
            support: criterion(Dimension::SparkingCombo, 50.0, 70.0),
        },
    },
    ArchetypeDef {
        name: "Ki-Blast Spammer",
        description: "Fills the screen with ki blasts from range",
        icon: "🔵",
        color: "#2980b9",
        strategy: MatchStrategy::Standard {
            criteria: &[criterion(Dimension::KiBlast, 60.0, 80.0)],
        },
    },
];

/// Sort by score, highest first; equal scores keep catalogue order.
fn rank(matches: &mut [ArchetypeMatch]) {
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}

/// Every primary archetype, ranked.
pub fn score_primary_archetypes(scores: &NormalizedScores) -> Vec<ArchetypeMatch> {
    let mut ranked: Vec<ArchetypeMatch> = PRIMARY_ARCHETYPES
        .iter()
        .map(|a| a.evaluate(scores))
        .collect();
    rank(&mut ranked);
    ranked
}

/// Assign primary, secondary and sub-type archetypes from normalized scores.
pub fn detect_playstyle_archetype(scores: &NormalizedScores) -> ArchetypeProfile {
    let [first, ..] = &PRIMARY_ARCHETYPES;
    let mut ranked = score_primary_archetypes(scores).into_iter();
    let primary = ranked.next().unwrap_or_else(|| first.evaluate(scores));

    let secondary = ranked.next().filter(|s| {
        s.score >= QUALIFYING_SCORE && primary.score - s.score <= SECONDARY_MAX_GAP
    });

    let mut sub_types: Vec<ArchetypeMatch> = SUB_TYPE_ARCHETYPES
        .iter()
        .map(|a| a.evaluate(scores))
        .filter(|m| m.score >= QUALIFYING_SCORE)
        .collect();
    rank(&mut sub_types);

    ArchetypeProfile {
        primary,
        secondary,
        sub_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(values: &[(Dimension, f64)]) -> NormalizedScores {
        values.iter().copied().collect()
    }

    fn score_of(matches: &[ArchetypeMatch], name: &str) -> f64 {
        matches
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.score)
            .unwrap_or_else(|| panic!("{} not scored", name))
    }

    #[test]
    fn test_melee_fighter() {
        let scores = profile(&[
            (Dimension::S1Blast, 10.0),
            (Dimension::S2Blast, 10.0),
            (Dimension::UltBlast, 10.0),
            (Dimension::Throws, 80.0),
            (Dimension::Vanishing, 75.0),
            (Dimension::DragonHoming, 55.0),
            (Dimension::Lightning, 30.0),
            (Dimension::Aggression, 70.0),
        ]);

        let ranked = score_primary_archetypes(&scores);
        // (300 + 120 + 120 + 100 + 30) / 7
        assert_eq!(score_of(&ranked, "Melee Fighter"), 95.7);
        // 10 / 60 × 75 over 2 criteria
        assert_eq!(score_of(&ranked, "Blast Spammer"), 6.3);
        assert_eq!(score_of(&ranked, "Ultimate Specialist"), 4.2);

        let result = detect_playstyle_archetype(&scores);
        assert_eq!(result.primary.name, "Melee Fighter");
        assert!(result.secondary.is_none());

        let subs: Vec<(&str, f64)> = result
            .sub_types
            .iter()
            .map(|s| (s.name.as_str(), s.score))
            .collect();
        // Rushdown: (100 + 100 + 25) / 3 with two core indicators met
        assert_eq!(subs, vec![("Grappler", 100.0), ("Rushdown Fighter", 75.0)]);
    }

    #[test]
    fn test_blast_spammer_with_support() {
        let scores = profile(&[
            (Dimension::S1Blast, 70.0),
            (Dimension::S2Blast, 90.0),
            (Dimension::UltBlast, 65.0),
            (Dimension::Charge, 55.0),
        ]);

        let ranked = score_primary_archetypes(&scores);
        assert_eq!(ranked[0].name, "Blast Spammer");
        assert_eq!(ranked[0].score, 100.0);
        assert_eq!(score_of(&ranked, "Melee Fighter"), 0.0);
        assert_eq!(score_of(&ranked, "Ultimate Specialist"), 50.0);

        let result = detect_playstyle_archetype(&scores);
        assert!(result.secondary.is_none());
    }

    #[test]
    fn test_blast_spammer_partial_credit() {
        let scores = profile(&[(Dimension::S1Blast, 30.0), (Dimension::S2Blast, 30.0)]);
        // 30 / 60 × 75 = 37.5 over 2 criteria
        let ranked = score_primary_archetypes(&scores);
        assert_eq!(score_of(&ranked, "Blast Spammer"), 18.8);
    }

    #[test]
    fn test_secondary_close_to_primary() {
        let scores = profile(&[
            (Dimension::Defense, 85.0),
            (Dimension::Guard, 75.0),
            (Dimension::SuperCounter, 65.0),
            (Dimension::UltBlast, 85.0),
            (Dimension::Offense, 75.0),
        ]);

        let result = detect_playstyle_archetype(&scores);
        // Both score 100: catalogue order breaks the tie
        assert_eq!(result.primary.name, "Ultimate Specialist");
        assert_eq!(result.secondary.as_ref().map(|s| s.name.as_str()), Some("Defensive Fighter"));
        assert_eq!(result.headline(), "Ultimate Specialist / Defensive Fighter");
    }

    #[test]
    fn test_secondary_too_far_behind() {
        let scores = profile(&[
            (Dimension::Defense, 85.0),
            (Dimension::Guard, 75.0),
            (Dimension::SuperCounter, 65.0),
            (Dimension::UltBlast, 60.0),
        ]);

        let result = detect_playstyle_archetype(&scores);
        assert_eq!(result.primary.name, "Defensive Fighter");
        assert!(result.secondary.is_none());
        assert_eq!(result.headline(), "Defensive Fighter");
    }

    #[test]
    fn test_blast_boundaries() {
        // 40 still counts as low blast usage for a melee fighter
        let at_cap = profile(&[
            (Dimension::S1Blast, 40.0),
            (Dimension::S2Blast, 40.0),
            (Dimension::UltBlast, 40.0),
        ]);
        assert_eq!(score_of(&score_primary_archetypes(&at_cap), "Melee Fighter"), 42.9);

        let over_cap = profile(&[
            (Dimension::S1Blast, 40.1),
            (Dimension::S2Blast, 40.0),
            (Dimension::UltBlast, 40.0),
        ]);
        assert_eq!(score_of(&score_primary_archetypes(&over_cap), "Melee Fighter"), 28.6);

        // 60 meets the blast spammer minimum: 150 / 2
        let at_min = profile(&[(Dimension::S1Blast, 60.0), (Dimension::S2Blast, 60.0)]);
        let ranked = score_primary_archetypes(&at_min);
        assert_eq!(ranked[0].name, "Blast Spammer");
        assert_eq!(ranked[0].score, 75.0);
        assert_eq!(score_of(&ranked, "Melee Fighter"), 14.3);
    }

    #[test]
    fn test_equal_scores_keep_catalogue_order() {
        let ranked = score_primary_archetypes(&NormalizedScores::default());
        let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Melee Fighter",
                "Blast Spammer",
                "Ultimate Specialist",
                "Defensive Fighter"
            ]
        );
        assert_eq!(ranked[0].score, 42.9);
        assert_eq!(ranked[1].score, 0.0);
    }

    #[test]
    fn test_rushdown_relaxed_by_dragon_dash() {
        let mut values = vec![
            (Dimension::Aggression, 55.0),
            (Dimension::Vanishing, 56.0),
            (Dimension::Lightning, 10.0),
        ];
        let without = detect_playstyle_archetype(&profile(&values));
        assert!(without.sub_types.iter().all(|s| s.name != "Rushdown Fighter"));

        values.push((Dimension::DragonDash, 60.0));
        let with = detect_playstyle_archetype(&profile(&values));
        // Minimum relaxed to 54: (100 + 100 + 10 / 54 × 50) / 3
        assert_eq!(score_of(&with.sub_types, "Rushdown Fighter"), 69.8);
    }

    #[test]
    fn test_rushdown_halved_below_two_indicators() {
        let score = MatchStrategy::Rushdown {
            core: [Dimension::Aggression, Dimension::Vanishing, Dimension::Lightning],
            threshold: Threshold::new(60.0, 80.0),
            support: criterion(Dimension::DragonDash, 50.0, 70.0),
        }
        .evaluate(&profile(&[
            (Dimension::Aggression, 55.0),
            (Dimension::Vanishing, 56.0),
            (Dimension::Lightning, 10.0),
        ]))
        .finish();

        assert_eq!(score, 16.8);
    }

    #[test]
    fn test_combo_fighter() {
        let with_support = profile(&[
            (Dimension::ComboFocus, 65.0),
            (Dimension::MaxCombo, 40.0),
            (Dimension::SparkingCombo, 55.0),
        ]);
        let result = detect_playstyle_archetype(&with_support);
        // (100 + 33.3) / 2 + 20
        assert_eq!(score_of(&result.sub_types, "Combo Fighter"), 86.7);

        let none_met = MatchStrategy::Combo {
            core: [Dimension::ComboFocus, Dimension::MaxCombo],
            threshold: Threshold::new(60.0, 80.0),
            support: criterion(Dimension::SparkingCombo, 50.0, 70.0),
        }
        .evaluate(&profile(&[(Dimension::ComboFocus, 50.0), (Dimension::MaxCombo, 50.0)]))
        .finish();
        assert_eq!(none_met, 20.8);
    }

    #[test]
    fn test_skill_user_combined() {
        let result = detect_playstyle_archetype(&profile(&[
            (Dimension::Skill1, 70.0),
            (Dimension::Skill2, 50.0),
        ]));
        assert_eq!(score_of(&result.sub_types, "Skill User"), 100.0);

        let result = detect_playstyle_archetype(&profile(&[
            (Dimension::Skill1, 70.0),
            (Dimension::Skill2, 40.0),
        ]));
        assert!(result.sub_types.iter().all(|s| s.name != "Skill User"));
    }

    #[test]
    fn test_sub_types_sorted_and_uncapped() {
        let result = detect_playstyle_archetype(&profile(&[
            (Dimension::Throws, 65.0),
            (Dimension::Sparking, 90.0),
            (Dimension::KiBlast, 70.0),
            (Dimension::Skill1, 100.0),
            (Dimension::Skill2, 100.0),
        ]));

        let names = result.sub_type_names(usize::MAX);
        assert_eq!(names.len(), 4);
        assert!(result
            .sub_types
            .windows(2)
            .all(|w| w[0].score >= w[1].score));
        assert_eq!(result.sub_type_names(2).len(), 2);
    }

    #[test]
    fn test_identical_scores_identical_archetypes() {
        let a = profile(&[(Dimension::Throws, 72.0), (Dimension::Guard, 33.0)]);
        let b = profile(&[(Dimension::Guard, 33.0), (Dimension::Throws, 72.0)]);

        assert_eq!(detect_playstyle_archetype(&a), detect_playstyle_archetype(&b));
    }
}
