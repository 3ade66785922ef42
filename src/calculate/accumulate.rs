//! Single pass over the match corpus, building running sums per AI strategy.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{CharacterAggregate, UsageTotals};

/// Running sums for one AI strategy.
#[derive(Debug, Clone, Default)]
pub(crate) struct AiAccumulator {
    pub overall: UsageTotals,
    /// Keyed by character name
    pub characters: BTreeMap<String, UsageTotals>,
}

/// All AI accumulators, keyed by strategy name.
#[derive(Debug, Clone, Default)]
pub(crate) struct Accumulation {
    pub ais: BTreeMap<String, AiAccumulator>,
    /// Matches dropped for having no battle time
    pub skipped: usize,
}

/// Walk every character's matches once.
pub(crate) fn accumulate(characters: &[CharacterAggregate]) -> Accumulation {
    let mut acc = Accumulation::default();

    for character in characters {
        for record in &character.matches {
            if !record.is_completed() {
                acc.skipped += 1;
                continue;
            }

            let ai = acc.ais.entry(record.ai_name().to_string()).or_default();
            ai.overall.record(record);
            ai.characters
                .entry(character.name.clone())
                .or_default()
                .record(record);
        }
    }

    debug!(
        "Accumulated {} AI strategies ({} incomplete matches skipped)",
        acc.ais.len(),
        acc.skipped
    );

    acc
}
