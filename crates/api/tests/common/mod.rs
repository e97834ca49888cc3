#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use copypanda_api::auth::jwt::{generate_access_token, JwtConfig};
use copypanda_api::config::ServerConfig;
use copypanda_api::engine::RunLauncher;
use copypanda_api::router::build_app_router;
use copypanda_api::state::AppState;
use copypanda_events::RunRegistry;
use copypanda_llm::{CompletionRequest, LlmError, TextGenerator};
use copypanda_pipeline::prompts::EDITOR_DRAFT_PREFIX;
use copypanda_pipeline::{ArticlePipeline, FailurePolicy};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const WRITER_REPLY: &str = "Generated paragraph.";
pub const SUGGESTIONS_REPLY: &str = r#"["Why It Matters", "Getting Started", "Common Mistakes"]"#;

/// Deterministic generator: writer prompts get [`WRITER_REPLY`], the editor
/// echoes the draft, suggestion prompts get [`SUGGESTIONS_REPLY`].
pub struct FakeGenerator;

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let user = request.last_user_message().unwrap_or_default();
        if let Some(draft) = user.strip_prefix(EDITOR_DRAFT_PREFIX) {
            return Ok(draft.to_string());
        }
        if user.contains("JSON array") {
            return Ok(SUGGESTIONS_REPLY.to_string());
        }
        Ok(WRITER_REPLY.to_string())
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_concurrent_runs: 4,
        section_concurrency: 1,
        failure_policy: FailurePolicy::Abort,
        run_retention_secs: 600,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Application state wired to the fake generator.
pub fn build_test_state(pool: PgPool) -> AppState {
    let config = test_config();
    let generator: Arc<dyn TextGenerator> = Arc::new(FakeGenerator);
    let pipeline = ArticlePipeline::new(Arc::clone(&generator), config.pipeline_options());
    let launcher = Arc::new(RunLauncher::new(
        pool.clone(),
        pipeline,
        config.max_concurrent_runs,
    ));

    AppState {
        pool,
        config: Arc::new(config),
        registry: Arc::new(RunRegistry::new()),
        launcher,
        generator,
    }
}

/// Build the full application router with all middleware layers, the same
/// way `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(build_test_state(pool), &test_config())
}

/// `Authorization` header value for `user_id`.
pub fn bearer(user_id: i64) -> String {
    let token = generate_access_token(user_id, &test_config().jwt).unwrap();
    format!("Bearer {token}")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user_id: Option<i64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        builder = builder.header("authorization", bearer(user_id));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_as(app: Router, user_id: i64, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(user_id), None).await
}

pub async fn post_json_as(
    app: Router,
    user_id: i64,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user_id), Some(body)).await
}

pub async fn put_json_as(
    app: Router,
    user_id: i64,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(user_id), Some(body)).await
}

pub async fn delete_as(app: Router, user_id: i64, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user_id), None).await
}

/// Poll `GET /articles/{id}` until the article leaves the running state.
pub async fn wait_for_article(app: Router, user_id: i64, id: i64) -> serde_json::Value {
    for _ in 0..100 {
        let response = get_as(app.clone(), user_id, &format!("/api/v1/articles/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["data"]["status"] != "running" {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("article {id} still running");
}
