use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, routing::post, Json, Router};
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use uigen_service::gateway::LlmGateway;
use uigen_service::generator::{Generator, MockGenerator};
use uigen_service::{build_app, AppState, ErrorResponse, GenerationResult, HealthResponse};

const UI_ORIGIN: &str = "http://localhost:5173";

fn app_with(generator: Arc<dyn Generator>) -> Router {
    build_app(Arc::new(AppState {
        generator,
        allow_origin: UI_ORIGIN.parse().unwrap(),
    }))
}

fn mock_app() -> Router {
    app_with(Arc::new(MockGenerator::new(Duration::ZERO)))
}

fn generate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, UI_ORIGIN)
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn spawn_upstream(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v1/chat/completions")
}

fn gateway_app(upstream_url: &str) -> Router {
    app_with(Arc::new(LlmGateway::new(
        upstream_url,
        "test-key",
        "test-model",
        Duration::from_secs(5),
    )))
}

#[tokio::test]
async fn e2e_generate_returns_a_shape_valid_result() {
    let app = mock_app();

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a login form"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: GenerationResult = body_json(response).await;
    assert_eq!(
        result.suggested_components,
        vec!["Button", "TextInput", "Card", "Container"]
    );
    assert!(result.code_snippet.contains("a login form"));
}

#[tokio::test]
async fn e2e_missing_prompt_is_a_400() {
    let app = mock_app();

    let response = app.oneshot(generate_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Prompt is required");
}

#[tokio::test]
async fn e2e_empty_prompt_is_a_400() {
    let app = mock_app();

    let response = app
        .oneshot(generate_request(r#"{"prompt":""}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Prompt is required");
}

#[tokio::test]
async fn e2e_health_always_succeeds() {
    let app = mock_app();

    let response = app.oneshot(get_request("/api/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: HealthResponse = body_json(response).await;
    assert_eq!(body.status, "OK");
    assert_eq!(body.message, "Server is running");
}

#[tokio::test]
async fn e2e_unknown_route_is_a_404() {
    let app = mock_app();

    let response = app.oneshot(get_request("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn e2e_cors_reflects_the_configured_origin_with_credentials() {
    let app = mock_app();

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a card"}"#))
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some(UI_ORIGIN)
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

async fn fenced_candidate() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "text": "```json\n{\"suggestedComponents\":[\"Button\"],\"codeSnippet\":\"x\"}\n```"
                }]
            }
        }]
    }))
}

async fn empty_candidates() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "candidates": [] }))
}

async fn upstream_error() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "model overloaded")
}

#[tokio::test]
async fn e2e_gateway_parses_a_fence_wrapped_candidate() {
    let upstream_url =
        spawn_upstream(Router::new().route("/v1/chat/completions", post(fenced_candidate))).await;
    let app = gateway_app(&upstream_url);

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a login form"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let result: GenerationResult = body_json(response).await;
    assert_eq!(result.suggested_components, vec!["Button"]);
    assert_eq!(result.code_snippet, "x");
}

#[tokio::test]
async fn e2e_gateway_maps_an_upstream_error_to_a_500_with_details() {
    let upstream_url =
        spawn_upstream(Router::new().route("/v1/chat/completions", post(upstream_error))).await;
    let app = gateway_app(&upstream_url);

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a login form"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Failed to generate code");
    assert!(body.details.unwrap().contains("503"));
}

#[tokio::test]
async fn e2e_gateway_rejects_a_response_without_candidates() {
    let upstream_url =
        spawn_upstream(Router::new().route("/v1/chat/completions", post(empty_candidates))).await;
    let app = gateway_app(&upstream_url);

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a login form"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(response).await;
    assert!(body.details.unwrap().contains("no candidate content"));
}

#[tokio::test]
async fn e2e_unreachable_upstream_is_a_500_not_a_crash() {
    let app = gateway_app("http://127.0.0.1:1/v1/chat/completions");

    let response = app
        .oneshot(generate_request(r#"{"prompt":"a login form"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: ErrorResponse = body_json(response).await;
    assert_eq!(body.error, "Failed to generate code");
}
