//! # Strategy Meta
//!
//! AI strategy aggregation and playstyle insight for fighting-game match data.
//!
//! ## Architecture
//!
//! - **models**: Match records, running totals, metrics, scores and archetypes
//! - **calculate**: Aggregation, normalization, classification and impact analysis
//! - **report**: The full pipeline from corpus to per-strategy insight
//! - **storage**: Corpus loading from the local filesystem
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod report;
pub mod storage;

pub use models::*;
