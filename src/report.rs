//! Strategy reports: the full pipeline from match corpus to per-strategy
//! insight, in population or character-baseline mode.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculate::{
    action_frequency, build_impact, capsule_impact, compute_ai_strategy_metrics,
    compute_character_baseline, detect_playstyle_archetype, filter_metrics_by_character,
    normalize_all, ActionDelta, BucketImpact, ImpactReference,
};
use crate::config::DisplayConfig;
use crate::models::{
    ArchetypeProfile, CharacterAggregate, CharacterBaseline, NormalizedScores, StrategyMetrics,
    StrategyMetricsMap,
};

/// What scores are normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Against every strategy in the corpus
    Population,
    /// Against one character's own averages
    Baseline,
}

/// Metrics, scores and archetypes for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInsight {
    pub metrics: StrategyMetrics,
    pub normalized: NormalizedScores,
    pub archetypes: ArchetypeProfile,
}

/// Every strategy in the corpus, most played first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyReport {
    pub generated_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<CharacterBaseline>,
    pub total_matches: u32,
    pub strategies: Vec<StrategyInsight>,
}

/// One strategy with its behavioral impact breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyDetail {
    pub generated_at: DateTime<Utc>,
    pub mode: AnalysisMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub insight: StrategyInsight,
    pub action_frequency: Vec<ActionDelta>,
    pub build_impact: Vec<BucketImpact>,
    pub capsule_impact: Vec<BucketImpact>,
}

/// Metrics for one analysis, already filtered when a character was found.
struct Analysis {
    metrics: StrategyMetricsMap,
    baseline: Option<CharacterBaseline>,
}

impl Analysis {
    fn run(corpus: &[CharacterAggregate], character: Option<&str>) -> Self {
        let all = compute_ai_strategy_metrics(corpus);

        let Some(character) = character else {
            return Self {
                metrics: all,
                baseline: None,
            };
        };

        match compute_character_baseline(&all, character) {
            Some(baseline) => Self {
                metrics: filter_metrics_by_character(&all, &baseline.character),
                baseline: Some(baseline),
            },
            None => {
                warn!(
                    "No matches for character '{}', using population mode",
                    character
                );
                Self {
                    metrics: all,
                    baseline: None,
                }
            }
        }
    }

    fn mode(&self) -> AnalysisMode {
        match self.baseline {
            Some(_) => AnalysisMode::Baseline,
            None => AnalysisMode::Population,
        }
    }

    fn character(&self) -> Option<String> {
        self.baseline.as_ref().map(|b| b.character.clone())
    }

    fn insights(&self) -> Vec<StrategyInsight> {
        let mut normalized = normalize_all(&self.metrics, self.baseline.as_ref());

        let mut insights: Vec<StrategyInsight> = self
            .metrics
            .iter()
            .map(|(name, metrics)| {
                let normalized = normalized.remove(name).unwrap_or_default();
                StrategyInsight {
                    archetypes: detect_playstyle_archetype(&normalized),
                    metrics: metrics.clone(),
                    normalized,
                }
            })
            .collect();

        insights.sort_by(|a, b| {
            b.metrics
                .total_matches
                .cmp(&a.metrics.total_matches)
                .then_with(|| a.metrics.name.cmp(&b.metrics.name))
        });
        insights
    }
}

/// Analyse every strategy, optionally from one character's point of view.
///
/// An unknown character falls back to population mode.
pub fn build_report(corpus: &[CharacterAggregate], character: Option<&str>) -> StrategyReport {
    let analysis = Analysis::run(corpus, character);
    let strategies = analysis.insights();
    let total_matches = strategies.iter().map(|s| s.metrics.total_matches).sum();

    info!(
        "Built {:?} report: {} strategies over {} matches",
        analysis.mode(),
        strategies.len(),
        total_matches
    );

    StrategyReport {
        generated_at: Utc::now(),
        mode: analysis.mode(),
        character: analysis.character(),
        total_matches,
        strategies,
        baseline: analysis.baseline,
    }
}

/// Analyse one strategy with its action, build and capsule impact.
///
/// Returns `None` when the strategy has no completed matches in scope.
pub fn build_detail(
    corpus: &[CharacterAggregate],
    strategy: &str,
    character: Option<&str>,
) -> Option<StrategyDetail> {
    let analysis = Analysis::run(corpus, character);
    let reference = ImpactReference::for_mode(&analysis.metrics, analysis.baseline.as_ref());
    let insight = analysis
        .insights()
        .into_iter()
        .find(|s| s.metrics.name == strategy)?;

    Some(StrategyDetail {
        generated_at: Utc::now(),
        mode: analysis.mode(),
        character: analysis.character(),
        action_frequency: action_frequency(&insight.metrics, &reference),
        build_impact: build_impact(&insight.metrics, &reference),
        capsule_impact: capsule_impact(&insight.metrics, &reference),
        insight,
    })
}

impl StrategyReport {
    pub fn strategy(&self, name: &str) -> Option<&StrategyInsight> {
        self.strategies.iter().find(|s| s.metrics.name == name)
    }

    /// Plain-text summary for the terminal.
    pub fn render_text(&self, display: &DisplayConfig) -> String {
        let mut out = String::new();

        match (&self.character, &self.baseline) {
            (Some(character), Some(baseline)) => {
                let _ = writeln!(
                    out,
                    "{} strategies faced by {} ({} matches, {:.1}% win rate)",
                    self.strategies.len(),
                    character,
                    self.total_matches,
                    baseline.metrics.win_rate
                );
            }
            _ => {
                let _ = writeln!(
                    out,
                    "{} strategies over {} matches",
                    self.strategies.len(),
                    self.total_matches
                );
            }
        }

        for insight in &self.strategies {
            let m = &insight.metrics;
            let _ = writeln!(out);
            let _ = writeln!(out, "{} [{}]", m.name, m.strategy_type);
            let _ = writeln!(
                out,
                "  {} matches ({:.1}% usage), {:.1}% wins, {:.1}% survival, confidence {}",
                m.total_matches,
                m.usage_rate,
                m.win_rate,
                m.survival_rate,
                m.data_quality.confidence
            );
            if !m.data_quality.confidence.is_reliable() {
                let _ = writeln!(out, "  Small sample: read the archetype as a hint");
            }
            let _ = writeln!(
                out,
                "  {:.0} dealt / {:.0} taken, {:.1} DPS, efficiency {:.2}, combat score {:.1}",
                m.avg_damage_dealt,
                m.avg_damage_taken,
                m.avg_dps,
                m.damage_efficiency,
                m.combat_performance_score
            );
            let _ = writeln!(
                out,
                "  {} {} ({:.1})",
                insight.archetypes.primary.icon,
                insight.archetypes.headline(),
                insight.archetypes.primary.score
            );

            let sub_types = insight.archetypes.sub_type_names(display.max_sub_types);
            if !sub_types.is_empty() {
                let _ = writeln!(out, "  Sub-types: {}", sub_types.join(", "));
            }

            let characters: Vec<String> = m
                .top_characters(display.top_characters)
                .into_iter()
                .map(|(name, usage)| format!("{} ({})", name, usage.matches))
                .collect();
            if !characters.is_empty() {
                let _ = writeln!(out, "  Characters: {}", characters.join(", "));
            }
        }

        out
    }
}

impl StrategyDetail {
    /// Plain-text breakdown for the terminal, largest action deltas first.
    pub fn render_text(&self, display: &DisplayConfig) -> String {
        let mut out = String::new();
        let m = &self.insight.metrics;
        let reference = match self.mode {
            AnalysisMode::Population => "population",
            AnalysisMode::Baseline => "character baseline",
        };

        let _ = writeln!(
            out,
            "{} [{}]: {} matches, {:.1}% wins",
            m.name, m.strategy_type, m.total_matches, m.win_rate
        );
        let _ = writeln!(out, "  {}", self.insight.archetypes.headline());
        let sub_types = self.insight.archetypes.sub_type_names(display.max_sub_types);
        if !sub_types.is_empty() {
            let _ = writeln!(out, "  Sub-types: {}", sub_types.join(", "));
        }

        let _ = writeln!(out, "\nAction frequency vs {}:", reference);
        let mut deltas: Vec<&ActionDelta> = self.action_frequency.iter().collect();
        deltas.sort_by(|a, b| {
            b.percent_diff
                .abs()
                .partial_cmp(&a.percent_diff.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for d in deltas {
            let _ = writeln!(
                out,
                "  {:<20} {:>10.1} {:>10.1} {:>+8.1}%",
                d.label, d.value, d.reference, d.percent_diff
            );
        }

        let sections = [
            ("Builds", &self.build_impact),
            ("Capsules", &self.capsule_impact),
        ];
        for (title, buckets) in sections {
            if buckets.is_empty() {
                continue;
            }
            let _ = writeln!(out, "\n{}:", title);
            for bucket in buckets {
                let standout = bucket.deltas.iter().max_by(|a, b| {
                    a.percent_diff
                        .abs()
                        .partial_cmp(&b.percent_diff.abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                let _ = match standout {
                    Some(d) if d.percent_diff != 0.0 => writeln!(
                        out,
                        "  {} ({} matches, {:.1}% wins): {} {:+.1}%",
                        bucket.name, bucket.count, bucket.win_rate, d.label, d.percent_diff
                    ),
                    _ => writeln!(
                        out,
                        "  {} ({} matches, {:.1}% wins)",
                        bucket.name, bucket.count, bucket.win_rate
                    ),
                };
            }
        }

        out
    }
}
