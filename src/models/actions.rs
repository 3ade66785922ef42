//! Per-match action frequencies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StatTotals;
use crate::calculate::average;

/// A tracked in-match action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
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
    Guard,
    ZCounter,
    SuperCounter,
    RevengeCounter,
    Skill1,
    Skill2,
    MaxCombo,
    DragonDash,
}

impl Action {
    pub const ALL: [Action; 21] = [
        Action::DamageDealt,
        Action::S1Blast,
        Action::S2Blast,
        Action::UltBlast,
        Action::KiBlast,
        Action::Charge,
        Action::Throws,
        Action::Vanishing,
        Action::DragonHoming,
        Action::Lightning,
        Action::SpeedImpact,
        Action::Sparking,
        Action::SparkingCombo,
        Action::Guard,
        Action::ZCounter,
        Action::SuperCounter,
        Action::RevengeCounter,
        Action::Skill1,
        Action::Skill2,
        Action::MaxCombo,
        Action::DragonDash,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Action::DamageDealt => "Damage Dealt",
            Action::S1Blast => "Super 1 Blasts",
            Action::S2Blast => "Super 2 Blasts",
            Action::UltBlast => "Ultimate Blasts",
            Action::KiBlast => "Ki Blasts",
            Action::Charge => "Ki Charges",
            Action::Throws => "Throws",
            Action::Vanishing => "Vanishing Attacks",
            Action::DragonHoming => "Dragon Homing",
            Action::Lightning => "Lightning Attacks",
            Action::SpeedImpact => "Speed Impacts",
            Action::Sparking => "Sparking Mode",
            Action::SparkingCombo => "Sparking Combos",
            Action::Guard => "Guards",
            Action::ZCounter => "Z-Counters",
            Action::SuperCounter => "Super Counters",
            Action::RevengeCounter => "Revenge Counters",
            Action::Skill1 => "Skill 1 Uses",
            Action::Skill2 => "Skill 2 Uses",
            Action::MaxCombo => "Max Combo",
            Action::DragonDash => "Dragon Dash Distance",
        }
    }

    /// Accumulated sum of this action.
    pub fn total(&self, t: &StatTotals) -> f64 {
        match self {
            Action::DamageDealt => t.damage_dealt,
            Action::S1Blast => t.s1_blast,
            Action::S2Blast => t.s2_blast,
            Action::UltBlast => t.ult_blast,
            Action::KiBlast => t.ki_blast,
            Action::Charge => t.charge,
            Action::Throws => t.throws,
            Action::Vanishing => t.vanishing,
            Action::DragonHoming => t.dragon_homing,
            Action::Lightning => t.lightning,
            Action::SpeedImpact => t.speed_impact,
            Action::Sparking => t.sparking,
            Action::SparkingCombo => t.sparking_combo,
            Action::Guard => t.guard,
            Action::ZCounter => t.z_counter,
            Action::SuperCounter => t.super_counter,
            Action::RevengeCounter => t.revenge_counter,
            Action::Skill1 => t.skill1,
            Action::Skill2 => t.skill2,
            Action::MaxCombo => t.max_combo,
            Action::DragonDash => t.dragon_dash,
        }
    }

    /// Decimal places used when averaging.
    fn precision(&self) -> i32 {
        match self {
            Action::DamageDealt | Action::DragonDash => 0,
            _ => 1,
        }
    }
}

/// Average count of every tracked action per match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionProfile(BTreeMap<Action, f64>);

impl ActionProfile {
    /// Average every action over the totals' own match count.
    pub fn from_totals(totals: &StatTotals) -> Self {
        Self(
            Action::ALL
                .iter()
                .map(|a| (*a, average(a.total(totals), totals.matches, a.precision())))
                .collect(),
        )
    }

    /// Match-weighted mean of several profiles.
    pub fn weighted_mean<'a>(profiles: impl IntoIterator<Item = (&'a ActionProfile, u32)>) -> Self {
        let mut sums: BTreeMap<Action, f64> = BTreeMap::new();
        let mut weight = 0u32;

        for (profile, matches) in profiles {
            weight += matches;
            for action in Action::ALL {
                *sums.entry(action).or_default() += profile.get(action) * matches as f64;
            }
        }

        Self(
            Action::ALL
                .iter()
                .map(|a| {
                    let total = sums.get(a).copied().unwrap_or(0.0);
                    (*a, average(total, weight, a.precision()))
                })
                .collect(),
        )
    }

    /// Average for one action (0 if absent).
    pub fn get(&self, action: Action) -> f64 {
        self.0.get(&action).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        self.0.iter().map(|(a, v)| (*a, *v))
    }
}
