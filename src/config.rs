use std::env;

/// Process-wide configuration, read from the environment once at startup.
///
/// No `Debug` impl: `upstream_api_key` must never reach logs.
pub struct AppConfig {
    pub port: u16,
    pub ui_origin: String,
    pub upstream_api_key: Option<String>,
    pub upstream_url: String,
    pub upstream_model: String,
    pub upstream_timeout_ms: u64,
    pub mock_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let ui_origin =
            env::var("UI_ORIGIN").unwrap_or_else(|_| "http://localhost:5173".to_string());

        let upstream_api_key = env::var("UPSTREAM_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let upstream_url = env::var("UPSTREAM_URL")
            .unwrap_or_else(|_| "https://openrouter.ai/api/v1/chat/completions".to_string());

        let upstream_model = env::var("UPSTREAM_MODEL")
            .unwrap_or_else(|_| "deepseek/deepseek-chat-v3-0324:free".to_string());

        let upstream_timeout_ms = env::var("UPSTREAM_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(20_000);

        let mock_delay_ms = env::var("MOCK_DELAY_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(1_000);

        Self {
            port,
            ui_origin,
            upstream_api_key,
            upstream_url,
            upstream_model,
            upstream_timeout_ms,
            mock_delay_ms,
        }
    }
}
