//! Core data models for the strategy engine.

mod actions;
mod archetype;
mod confidence;
mod match_record;
mod metrics;
mod scores;
mod strategy;
mod totals;

pub use actions::*;
pub use archetype::*;
pub use confidence::*;
pub use match_record::*;
pub use metrics::*;
pub use scores::*;
pub use strategy::*;
pub use totals::*;
