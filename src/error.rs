use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::models::ErrorResponse;

/// Everything that can go wrong inside one generation cycle. Nothing here is
/// fatal to the process; each request fails on its own.
#[derive(Debug, Error)]
pub enum Error {
    /// User-correctable input problem, surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// The upstream model (or the proxy standing in for it) misbehaved:
    /// non-success status, missing candidate, unparseable payload.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// The network hop itself failed or timed out.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Copying to the system clipboard failed. Logged, never surfaced.
    #[error("clipboard failure: {0}")]
    Clipboard(String),
}

impl Error {
    pub fn empty_prompt() -> Self {
        Self::Validation("Prompt is required".to_string())
    }

    /// The single user-facing string for this error. Validation messages pass
    /// through untouched; everything else collapses to generic copy.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Upstream(_) => "Failed to generate code. Please try again.".to_string(),
            Self::Transport(_) | Self::Clipboard(_) => {
                "Sorry, something went wrong. Please try again.".to_string()
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: message,
                    details: None,
                }),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to generate code".to_string(),
                    details: Some(other.to_string()),
                }),
            )
                .into_response(),
        }
    }
}
