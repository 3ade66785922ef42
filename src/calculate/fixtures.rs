//! Match fixtures shared by the calculation tests.

use crate::models::{CharacterAggregate, MatchRecord};

/// A completed 100-second match against `ai`.
pub fn completed(ai: &str) -> MatchRecord {
    MatchRecord {
        ai_strategy: Some(ai.to_string()),
        battle_time: 100.0,
        ..Default::default()
    }
}

/// `character` playing the same match `count` times.
pub fn repeated(character: &str, record: MatchRecord, count: usize) -> CharacterAggregate {
    CharacterAggregate {
        name: character.to_string(),
        matches: vec![record; count],
    }
}

/// Merge several aggregates for the same character into one.
pub fn combined(character: &str, parts: Vec<CharacterAggregate>) -> CharacterAggregate {
    CharacterAggregate {
        name: character.to_string(),
        matches: parts.into_iter().flat_map(|p| p.matches).collect(),
    }
}
