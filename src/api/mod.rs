mod handlers;
pub mod models;

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use handlers::{generate, health, not_found};

pub fn router(state: Arc<AppState>) -> Router {
    // Credentials are allowed, so the origin must be the one configured for
    // the UI rather than a wildcard.
    let cors = CorsLayer::new()
        .allow_origin(state.allow_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/health", get(health))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}
