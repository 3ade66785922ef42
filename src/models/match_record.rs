//! Match record input model.
//!
//! Match files are produced by an upstream upload pipeline, so every field is
//! optional and malformed values fall back to a default instead of rejecting
//! the record.

use serde::{Deserialize, Serialize};

/// Default AI strategy name for matches that don't carry one.
pub const UNKNOWN_STRATEGY: &str = "Unknown";

/// One entry of a build's cost breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildCost {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient::number")]
    pub cost: f64,
}

/// Equipped build summary for a match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildComposition {
    /// Build type label (e.g. "Melee Focus")
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: Option<String>,

    /// Cost spent per category
    #[serde(default, deserialize_with = "lenient::entries")]
    pub breakdown: Vec<BuildCost>,
}

/// An equipped capsule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
}

/// A single bout attributed to one character and one AI strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub ai_strategy: Option<String>,

    #[serde(default, deserialize_with = "lenient::boolean")]
    pub won: bool,

    /// Battle length in seconds; zero means the match did not complete
    #[serde(default, deserialize_with = "lenient::number")]
    pub battle_time: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub damage_done: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub damage_taken: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub kills: f64,

    #[serde(rename = "hPGaugeValue", default, deserialize_with = "lenient::number")]
    pub hp_gauge_value: f64,

    #[serde(rename = "hPGaugeValueMax", default, deserialize_with = "lenient::number")]
    pub hp_gauge_value_max: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub max_combo_num: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub max_combo_damage: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub sparking_combo_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub s1_blast: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub s2_blast: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub ult_blast: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub s1_hit_blast: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub s2_hit_blast: f64,

    #[serde(alias = "uLTHitBlast", default, deserialize_with = "lenient::number")]
    pub ult_hit_blast: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub exa1_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub exa2_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub throw_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub vanishing_attack_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub dragon_homing_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub lightning_attack_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub speed_impact_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub speed_impact_wins: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub guard_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub z_counter_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub super_counter_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub revenge_counter_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub sparking_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub dragon_dash_mileage: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub shot_energy_bullet_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub charge_count: f64,

    #[serde(default, deserialize_with = "lenient::number")]
    pub tags: f64,

    #[serde(default, deserialize_with = "lenient::or_default")]
    pub build_composition: Option<BuildComposition>,

    #[serde(default, deserialize_with = "lenient::entries")]
    pub equipped_capsules: Vec<Capsule>,
}

impl MatchRecord {
    /// Returns true if the match ran to completion (`battle_time > 0`).
    pub fn is_completed(&self) -> bool {
        self.battle_time > 0.0
    }

    /// AI strategy name, defaulting to "Unknown".
    pub fn ai_name(&self) -> &str {
        self.ai_strategy.as_deref().unwrap_or(UNKNOWN_STRATEGY)
    }

    /// Returns true if the character finished with health remaining.
    pub fn survived(&self) -> bool {
        self.hp_gauge_value > 0.0
    }

    /// Build type label, if the match carries one.
    pub fn build_label(&self) -> Option<&str> {
        self.build_composition
            .as_ref()
            .and_then(|b| b.label.as_deref())
    }

    /// Cost breakdown of the equipped build (empty if none).
    pub fn build_breakdown(&self) -> &[BuildCost] {
        self.build_composition
            .as_ref()
            .map(|b| b.breakdown.as_slice())
            .unwrap_or(&[])
    }
}

/// A character and its ordered match history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterAggregate {
    #[serde(
        alias = "characterName",
        alias = "character",
        default,
        deserialize_with = "lenient::string_or_empty"
    )]
    pub name: String,

    /// Entries that are not match objects are dropped
    #[serde(default, deserialize_with = "lenient::entries")]
    pub matches: Vec<MatchRecord>,
}

impl CharacterAggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matches: Vec::new(),
        }
    }

    /// Builder method to append a match.
    pub fn with_match(mut self, record: MatchRecord) -> Self {
        self.matches.push(record);
        self
    }

    /// Number of matches that ran to completion.
    pub fn completed_matches(&self) -> usize {
        self.matches.iter().filter(|m| m.is_completed()).count()
    }
}

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value.as_ref().map(as_number).unwrap_or(0.0))
    }

    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|x| x != 0.0),
            Some(Value::String(s)) => {
                matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
            }
            _ => false,
        })
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let value = Option::<Value>::deserialize(d)?;
        Ok(match value {
            Some(Value::String(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn string_or_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(string(d)?.unwrap_or_default())
    }

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Option::<Value>::deserialize(d)?;
        Ok(value
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    /// A list whose undecodable elements are dropped; anything but an array
    /// is empty.
    pub fn entries<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = match Option::<Value>::deserialize(d)? {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(other) => {
                warn!("Expected a list, found {}", kind(&other));
                return Ok(Vec::new());
            }
        };

        let total = items.len();
        let decoded: Vec<T> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if decoded.len() < total {
            warn!("Dropped {} malformed list entries", total - decoded.len());
        }
        Ok(decoded)
    }

    fn kind(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "a boolean",
            Value::Number(_) => "a number",
            Value::String(_) => "a string",
            Value::Array(_) => "an array",
            Value::Object(_) => "an object",
        }
    }

    fn as_number(value: &Value) -> f64 {
        let n = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        n.filter(|x| x.is_finite()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_record_camel_case_fields() {
        let record: MatchRecord = serde_json::from_value(json!({
            "aiStrategy": "Balanced Strategy",
            "won": true,
            "battleTime": 95.5,
            "damageDone": 42000,
            "hPGaugeValue": 1200,
            "hPGaugeValueMax": 40000,
            "s1HitBlast": 2,
            "uLTHitBlast": 1,
            "exa1Count": 3,
            "shotEnergyBulletCount": 12
        }))
        .unwrap();

        assert_eq!(record.ai_name(), "Balanced Strategy");
        assert!(record.won);
        assert!(record.is_completed());
        assert!(record.survived());
        assert_eq!(record.damage_done, 42000.0);
        assert_eq!(record.hp_gauge_value_max, 40000.0);
        assert_eq!(record.s1_hit_blast, 2.0);
        assert_eq!(record.ult_hit_blast, 1.0);
        assert_eq!(record.exa1_count, 3.0);
        assert_eq!(record.shot_energy_bullet_count, 12.0);
    }

    #[test]
    fn test_match_record_defaults() {
        let record: MatchRecord = serde_json::from_value(json!({})).unwrap();

        assert_eq!(record.ai_name(), UNKNOWN_STRATEGY);
        assert!(!record.won);
        assert!(!record.is_completed());
        assert!(record.build_label().is_none());
        assert!(record.build_breakdown().is_empty());
        assert!(record.equipped_capsules.is_empty());
    }

    #[test]
    fn test_match_record_lenient_values() {
        let record: MatchRecord = serde_json::from_value(json!({
            "aiStrategy": "   ",
            "won": "true",
            "battleTime": "120",
            "damageDone": null,
            "damageTaken": "n/a",
            "kills": true,
            "buildComposition": "broken",
            "equippedCapsules": [{"id": 1042, "name": "Ki Control"}]
        }))
        .unwrap();

        assert_eq!(record.ai_name(), UNKNOWN_STRATEGY);
        assert!(record.won);
        assert_eq!(record.battle_time, 120.0);
        assert_eq!(record.damage_done, 0.0);
        assert_eq!(record.damage_taken, 0.0);
        assert_eq!(record.kills, 1.0);
        assert!(record.build_composition.is_none());
        assert_eq!(record.equipped_capsules[0].id, "1042");
        assert_eq!(
            record.equipped_capsules[0].name.as_deref(),
            Some("Ki Control")
        );
    }

    #[test]
    fn test_match_record_build_composition() {
        let record: MatchRecord = serde_json::from_value(json!({
            "battleTime": 60,
            "buildComposition": {
                "label": "Blast Focus",
                "breakdown": [{"name": "Blast", "cost": 5}, {"name": "Melee", "cost": "2"}]
            }
        }))
        .unwrap();

        assert_eq!(record.build_label(), Some("Blast Focus"));
        assert_eq!(record.build_breakdown().len(), 2);
        assert_eq!(record.build_breakdown()[1].cost, 2.0);
    }

    #[test]
    fn test_character_aggregate_aliases() {
        let aggregate: CharacterAggregate = serde_json::from_value(json!({
            "characterName": "Goku (Super)",
            "matches": [{"battleTime": 10}, {"battleTime": 0}]
        }))
        .unwrap();

        assert_eq!(aggregate.name, "Goku (Super)");
        assert_eq!(aggregate.matches.len(), 2);
        assert_eq!(aggregate.completed_matches(), 1);
    }

    #[test]
    fn test_character_aggregate_drops_bad_matches() {
        let aggregate: CharacterAggregate = serde_json::from_value(json!({
            "name": "Goku",
            "matches": [{"battleTime": 10}, null, 7, "oops", {"battleTime": "20"}]
        }))
        .unwrap();

        assert_eq!(aggregate.matches.len(), 2);
        assert_eq!(aggregate.matches[1].battle_time, 20.0);

        for matches in [json!(null), json!("none"), json!({"battleTime": 5})] {
            let aggregate: CharacterAggregate =
                serde_json::from_value(json!({"name": "Gohan", "matches": matches})).unwrap();
            assert_eq!(aggregate.name, "Gohan");
            assert!(aggregate.matches.is_empty());
        }
    }

    #[test]
    fn test_character_aggregate_blank_name() {
        let aggregate: CharacterAggregate =
            serde_json::from_value(json!({"name": null, "matches": [{}]})).unwrap();

        assert!(aggregate.name.is_empty());
        assert_eq!(aggregate.matches.len(), 1);
    }
}
