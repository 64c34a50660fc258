use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::error::Error;
use crate::AppState;

use super::models::{ErrorResponse, GenerateRequest, GenerationResult, HealthResponse};

pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerationResult>, Error> {
    let prompt = payload.prompt.trim();
    if prompt.is_empty() {
        return Err(Error::empty_prompt());
    }

    info!(chars = prompt.len(), "generation requested");
    match state.generator.generate(prompt).await {
        Ok(result) => {
            info!(
                components = result.suggested_components.len(),
                "generation succeeded"
            );
            Ok(Json(result))
        }
        Err(err) => {
            error!("generation failed: {err}");
            Err(err)
        }
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "route not found".to_string(),
            details: None,
        }),
    )
        .into_response()
}
