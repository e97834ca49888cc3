//! HTTP-level integration tests for article submission and status queries.
//!
//! Runs execute in the background against the fake generator; tests poll
//! the status endpoint until the article leaves the running state.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get_as, post_json_as, wait_for_article};
use copypanda_db::repositories::ArticleRepo;
use serde_json::json;
use sqlx::PgPool;

const USER: i64 = 7;

fn submission(sections: &[&str]) -> serde_json::Value {
    json!({
        "title": "Benefits of Remote Work",
        "sections": sections.iter().map(|s| json!({ "title": s })).collect::<Vec<_>>(),
    })
}

fn headings(content: &str) -> Vec<&str> {
    content.lines().filter(|l| l.starts_with('#')).collect()
}

// ---------------------------------------------------------------------------
// Test: submission returns a run handle and completes with 5 headings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_generates_article(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json_as(
        app.clone(),
        USER,
        "/api/v1/articles",
        submission(&["Flexibility", "Cost Savings", "Challenges"]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let article_id = json["data"]["article_id"].as_i64().unwrap();
    assert!(json["data"]["run_id"].as_str().unwrap().starts_with("run_"));
    assert_eq!(json["data"]["public_token"].as_str().unwrap().len(), 32);

    let article = wait_for_article(app, USER, article_id).await;
    assert_eq!(article["status"], "completed");
    assert!(article["run"].is_null());

    let content = article["content"].as_str().unwrap();
    assert_eq!(
        headings(content),
        vec![
            "# Benefits of Remote Work",
            "## Flexibility",
            "## Cost Savings",
            "## Challenges",
            "## Conclusion",
        ]
    );
}

// ---------------------------------------------------------------------------
// Test: preset options add FAQ and summary after the conclusion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_preset_options_add_faq_and_summary(pool: PgPool) {
    let app = build_test_app(pool);

    let preset = post_json_as(
        app.clone(),
        USER,
        "/api/v1/presets",
        json!({ "name": "Full", "options": { "faq_sections": true, "summary": true } }),
    )
    .await;
    let preset_id = body_json(preset).await["data"]["id"].as_i64().unwrap();

    let mut body = submission(&["Flexibility", "Cost Savings", "Challenges"]);
    body["preset_id"] = json!(preset_id);
    let response = post_json_as(app.clone(), USER, "/api/v1/articles", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let article_id = body_json(response).await["data"]["article_id"].as_i64().unwrap();

    let article = wait_for_article(app, USER, article_id).await;
    let content = article["content"].as_str().unwrap();
    let found = headings(content);
    assert_eq!(found.len(), 7);
    assert_eq!(
        &found[4..],
        &["## Conclusion", "## Frequently Asked Questions", "## Summary"]
    );
}

// ---------------------------------------------------------------------------
// Test: eleven sections are rejected before anything is stored
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_eleven_sections_rejected(pool: PgPool) {
    let titles: Vec<String> = (1..=11).map(|i| format!("Section {i}")).collect();
    let refs: Vec<&str> = titles.iter().map(String::as_str).collect();

    let response = post_json_as(
        build_test_app(pool.clone()),
        USER,
        "/api/v1/articles",
        submission(&refs),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    assert!(ArticleRepo::list_for_user(&pool, USER).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_title_rejected(pool: PgPool) {
    let mut body = submission(&["Flexibility"]);
    body["title"] = json!("x".repeat(191));

    let response = post_json_as(build_test_app(pool), USER, "/api/v1/articles", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: presets must exist and belong to the caller
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_preset_forbidden(pool: PgPool) {
    let app = build_test_app(pool.clone());

    let preset = post_json_as(app.clone(), 99, "/api/v1/presets", json!({ "name": "Theirs" })).await;
    let preset_id = body_json(preset).await["data"]["id"].as_i64().unwrap();

    let mut body = submission(&["Flexibility"]);
    body["preset_id"] = json!(preset_id);
    let response = post_json_as(app.clone(), USER, "/api/v1/articles", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let mut body = submission(&["Flexibility"]);
    body["preset_id"] = json!(123456);
    let response = post_json_as(app, USER, "/api/v1/articles", body).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(ArticleRepo::list_for_user(&pool, USER).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: status query while running includes the run handle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_running_article_exposes_run_handle(pool: PgPool) {
    use copypanda_db::models::generation_task::CreateGenerationTask;
    use copypanda_db::repositories::GenerationTaskRepo;

    let article = ArticleRepo::create(&pool, USER, "Pending").await.unwrap();
    GenerationTaskRepo::create(
        &pool,
        &CreateGenerationTask {
            article_id: article.id,
            run_id: "run_pending".into(),
            public_token: "t".repeat(32),
        },
    )
    .await
    .unwrap();

    let app = build_test_app(pool);
    let response = get_as(app.clone(), USER, &format!("/api/v1/articles/{}", article.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "running");
    assert_eq!(json["data"]["run"]["run_id"], "run_pending");
    assert_eq!(json["data"]["run"]["public_token"], "t".repeat(32));

    let response = get_as(app, USER + 1, &format!("/api/v1/articles/{}", article.id)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: list returns newest first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_articles_newest_first(pool: PgPool) {
    let first = ArticleRepo::create(&pool, USER, "First").await.unwrap();
    let second = ArticleRepo::create(&pool, USER, "Second").await.unwrap();
    ArticleRepo::create(&pool, USER + 1, "Other").await.unwrap();

    let response = get_as(build_test_app(pool), USER, "/api/v1/articles").await;
    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ---------------------------------------------------------------------------
// Test: section suggestions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_suggest_sections(pool: PgPool) {
    let response = post_json_as(
        build_test_app(pool.clone()),
        USER,
        "/api/v1/articles/sections/suggest",
        json!({ "title": "Learning Rust", "count": 2 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(["Why It Matters", "Getting Started"]));

    let response = post_json_as(
        build_test_app(pool),
        USER,
        "/api/v1/articles/sections/suggest",
        json!({ "title": "Learning Rust", "count": 0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
