use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{load_corpus, non_empty, ApiError};
use crate::calculate::{compute_ai_strategy_metrics, compute_character_baseline};
use crate::models::CharacterBaseline;

#[derive(Debug, Serialize)]
pub struct BaselineResponse {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub baseline: CharacterBaseline,
}

pub async fn get_baseline(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BaselineResponse>, ApiError> {
    let character = non_empty(Some(name.as_str()))
        .ok_or_else(|| ApiError::BadRequest("character name is empty".to_string()))?;

    let corpus = load_corpus(&state)?;
    let metrics = compute_ai_strategy_metrics(&corpus);
    let baseline = compute_character_baseline(&metrics, character)
        .ok_or_else(|| ApiError::NotFound(format!("no matches for character '{}'", character)))?;

    Ok(Json(BaselineResponse {
        generated_at: Utc::now(),
        baseline,
    }))
}
