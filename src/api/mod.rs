//! REST API endpoints.
//!
//! Axum-based HTTP API serving strategy reports, per-strategy impact detail
//! and character baselines. Every request reads the corpus from disk.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::models::CharacterAggregate;
use crate::storage::{self, StorageError};
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::PathNotFound(path) => {
                ApiError::NotFound(format!("no match data at {}", path.display()))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Load the match corpus for one request.
pub fn load_corpus(state: &AppState) -> Result<Vec<CharacterAggregate>, ApiError> {
    Ok(storage::load_corpus(&state.storage)?)
}

/// Treat a blank query value as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn cors_layer(origin: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(Any);

    if origin == "*" {
        return cors.allow_origin(Any);
    }

    match origin.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            warn!("Invalid CORS origin '{}' ({}), allowing any", origin, e);
            cors.allow_origin(Any)
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/strategies", get(routes::strategies::list_strategies))
        .route("/api/strategies/:name", get(routes::strategies::get_strategy))
        .route(
            "/api/characters/:name/baseline",
            get(routes::characters::get_baseline),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
