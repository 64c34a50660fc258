pub mod api;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod generator;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use tracing::info;

use config::AppConfig;
use gateway::LlmGateway;
use generator::{Generator, MockGenerator};

pub use api::models::{ErrorResponse, GenerateRequest, GenerationResult, HealthResponse};
pub use error::Error;

pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub allow_origin: HeaderValue,
}

impl AppState {
    /// Picks the backend: the gateway when an API key is configured, the
    /// canned mock otherwise.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let allow_origin = config
            .ui_origin
            .parse::<HeaderValue>()
            .with_context(|| format!("invalid UI_ORIGIN value: {}", config.ui_origin))?;

        let generator: Arc<dyn Generator> = match &config.upstream_api_key {
            Some(api_key) => {
                info!(model = %config.upstream_model, "using LLM gateway backend");
                Arc::new(LlmGateway::new(
                    &config.upstream_url,
                    api_key,
                    &config.upstream_model,
                    Duration::from_millis(config.upstream_timeout_ms),
                ))
            }
            None => {
                info!(delay_ms = config.mock_delay_ms, "using mock backend");
                Arc::new(MockGenerator::new(Duration::from_millis(
                    config.mock_delay_ms,
                )))
            }
        };

        Ok(Self {
            generator,
            allow_origin,
        })
    }
}

pub fn build_app(state: Arc<AppState>) -> Router {
    api::router(state)
}

pub async fn run_server(app: Router, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
