//! HTTP surface of the ingestion service.
//!
//! Routes:
//!   POST /observations    store one reading (201, or 400 when fields are missing)
//!   GET  /observations    every stored reading, insertion order, no paging
//!   GET  /health          liveness
//!
//! `/api/locations` is kept as an alias of `/observations` for devices
//! already deployed against the old path.

use crate::{
    config::AppConfig,
    error::{PalmError, PalmResult},
    ingest::IngestionService,
    observation::{Observation, ObservationInput},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct ApiState {
    pub ingestion: Arc<IngestionService>,
}

/// Body of a successful `POST /observations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub message: String,
    pub data:    Observation,
}

pub fn router(ingestion: Arc<IngestionService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/observations", get(list_observations).post(create_observation))
        .route("/api/locations", get(list_observations).post(create_observation))
        .layer(cors)
        .with_state(ApiState { ingestion })
}

/// Bind `config.bind_address` and serve until Ctrl-C.
pub async fn serve(config: &AppConfig, ingestion: Arc<IngestionService>) -> PalmResult<()> {
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    log::info!("PalmCheck backend running at http://{}", listener.local_addr()?);

    axum::serve(listener, router(ingestion))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("PalmCheck backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn create_observation(
    State(state): State<ApiState>,
    body: Result<Json<ObservationInput>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredResponse>), ApiError> {
    let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let ingestion = Arc::clone(&state.ingestion);
    let observation = tokio::task::spawn_blocking(move || ingestion.record(input))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok((
        StatusCode::CREATED,
        Json(StoredResponse {
            message: "Location stored".into(),
            data: observation,
        }),
    ))
}

async fn list_observations(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Observation>>, ApiError> {
    let ingestion = Arc::clone(&state.ingestion);
    let observations = tokio::task::spawn_blocking(move || ingestion.list())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(observations))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Palm(#[from] PalmError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Palm(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Palm(e) => {
                log::error!("Request failed: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
            ApiError::Internal(msg) => {
                log::error!("Internal error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
