//! Character-filtered re-aggregation.
//!
//! Every strategy keeps its per-character sums, so a filter can rebuild the
//! metrics from the one character's totals without touching the corpus again.

use std::collections::BTreeMap;

use tracing::debug;

use super::derive::{derive_metrics, GlobalTotals, PerAiMetrics};
use crate::models::{CharacterBaseline, StrategyMetricsMap, StrategyType, UsageTotals};

/// Find the character name as recorded in the metrics.
///
/// Exact matches win; otherwise the first case-insensitive match in name
/// order is used.
fn resolve_character(metrics: &StrategyMetricsMap, character: &str) -> Option<String> {
    let known = || metrics.values().flat_map(|m| m.character_usage.keys());

    if known().any(|name| name == character) {
        return Some(character.to_string());
    }

    let wanted = character.to_lowercase();
    let mut candidates: Vec<&String> = known()
        .filter(|name| name.to_lowercase() == wanted)
        .collect();
    candidates.sort();
    candidates.first().map(|name| name.to_string())
}

/// Metrics recomputed from one character's matches only.
///
/// Strategies the character never faced are left out. Usage rates are
/// relative to that character's matches, and each entry keeps a snapshot of
/// its unfiltered headline values.
pub fn filter_metrics_by_character(
    metrics: &StrategyMetricsMap,
    character: &str,
) -> StrategyMetricsMap {
    let Some(character) = resolve_character(metrics, character) else {
        debug!("No strategy has matches for character '{}'", character);
        return StrategyMetricsMap::new();
    };

    let per_ai = PerAiMetrics(
        metrics
            .values()
            .filter_map(|m| {
                let usage = m.character_usage.get(&character)?;
                let characters = BTreeMap::from([(character.clone(), usage.totals.clone())]);
                let mut filtered = derive_metrics(&m.name, &usage.totals, &characters)?;
                filtered.unfiltered = m.unfiltered.or_else(|| Some(m.snapshot()));
                Some(filtered)
            })
            .collect(),
    );
    let global = GlobalTotals::from_metrics(&per_ai);

    debug!(
        "Filtered {} strategies to character '{}' ({} matches)",
        per_ai.0.len(),
        character,
        global.total_matches
    );

    per_ai.finalize(global)
}

/// A character's own averages across every strategy it faced.
///
/// Returns `None` when no strategy has matches for the character.
pub fn compute_character_baseline(
    metrics: &StrategyMetricsMap,
    character: &str,
) -> Option<CharacterBaseline> {
    let character = resolve_character(metrics, character)?;

    let mut merged = UsageTotals::default();
    let mut strategies_faced = 0;
    for usage in metrics.values().filter_map(|m| m.character_usage.get(&character)) {
        merged.merge(&usage.totals);
        strategies_faced += 1;
    }

    let characters = BTreeMap::from([(character.clone(), merged.clone())]);
    let mut baseline = derive_metrics(&character, &merged, &characters)?;
    baseline.strategy_type = StrategyType::Other;
    baseline.usage_rate = 100.0;

    Some(CharacterBaseline {
        character,
        strategies_faced,
        metrics: baseline,
    })
}
