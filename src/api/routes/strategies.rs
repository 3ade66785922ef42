use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::{load_corpus, non_empty, ApiError};
use crate::report::{build_detail, build_report, StrategyDetail, StrategyReport};

#[derive(Debug, Default, Deserialize)]
pub struct CharacterParams {
    pub character: Option<String>,
}

pub async fn list_strategies(
    State(state): State<AppState>,
    Query(params): Query<CharacterParams>,
) -> Result<Json<StrategyReport>, ApiError> {
    let corpus = load_corpus(&state)?;
    let character = non_empty(params.character.as_deref());
    debug!("Strategy report requested (character: {:?})", character);

    Ok(Json(build_report(&corpus, character)))
}

pub async fn get_strategy(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CharacterParams>,
) -> Result<Json<StrategyDetail>, ApiError> {
    let corpus = load_corpus(&state)?;
    let character = non_empty(params.character.as_deref());

    build_detail(&corpus, &name, character)
        .map(Json)
        .ok_or_else(|| match character {
            Some(character) => ApiError::NotFound(format!(
                "strategy '{}' has no matches against {}",
                name, character
            )),
            None => ApiError::NotFound(format!("strategy '{}'", name)),
        })
}

#[cfg(test)]
mod tests {
    use crate::api::build_router;
    use crate::api::routes::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_list_strategies_population() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/strategies").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "population");
        assert_eq!(json["total_matches"], 13);
        assert!(json["generated_at"].is_string());

        let strategies = json["strategies"].as_array().unwrap();
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[0]["metrics"]["name"], "Defense Strategy");
        assert_eq!(strategies[0]["metrics"]["total_matches"], 7);
        assert!(strategies[0]["archetypes"]["primary"]["name"].is_string());
        assert!(strategies[0]["normalized"]["throws"].is_number());
    }

    #[tokio::test]
    async fn test_list_strategies_for_character() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/strategies?character=Goku").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "baseline");
        assert_eq!(json["character"], "Goku");
        assert_eq!(json["total_matches"], 8);
        assert_eq!(json["baseline"]["strategies_faced"], 2);

        let attack = &json["strategies"][0]["metrics"];
        assert_eq!(attack["name"], "Attack Strategy");
        assert_eq!(attack["usage_rate"], 75.0);
        assert_eq!(attack["unfiltered"]["total_matches"], 6);
    }

    #[tokio::test]
    async fn test_blank_character_is_population() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/strategies?character=").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["mode"], "population");
    }

    #[tokio::test]
    async fn test_missing_data_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/strategies").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_get_strategy_detail() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());
        let app = build_router(setup_test_state(tmp.path()));

        let (status, json) = get_json(app, "/api/strategies/Attack%20Strategy").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["insight"]["metrics"]["total_matches"], 6);
        assert_eq!(json["insight"]["metrics"]["win_rate"], 50.0);
        assert!(!json["action_frequency"].as_array().unwrap().is_empty());
        assert_eq!(json["build_impact"][0]["name"], "Melee Focus");
        assert_eq!(json["build_impact"][0]["count"], 6);
    }

    #[tokio::test]
    async fn test_get_strategy_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        write_corpus(tmp.path());

        let app = build_router(setup_test_state(tmp.path()));
        let (status, json) = get_json(app, "/api/strategies/Missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");

        // Vegeta never faced the attack strategy
        let app = build_router(setup_test_state(tmp.path()));
        let (status, _) =
            get_json(app, "/api/strategies/Attack%20Strategy?character=Vegeta").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
