use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use uigen_service::config::AppConfig;
use uigen_service::{build_app, run_server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uigen_service=info")),
        )
        .init();

    let config = AppConfig::from_env();
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_app(state);

    info!(port = config.port, "starting uigen-service");
    run_server(app, config.port).await
}
