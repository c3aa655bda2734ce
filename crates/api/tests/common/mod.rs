#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use swinglab_api::config::ServerConfig;
use swinglab_api::router::build_app_router;
use swinglab_api::state::AppState;
use swinglab_core::types::DbId;
use swinglab_scoring::{ProcessorSupervisor, ScoringClient};

/// Build a test `ServerConfig` with safe defaults.
///
/// The processor URL points at an unroutable local port so any scoring
/// call fails fast with a connection error instead of hanging.
pub fn test_config(storage_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage_root,
        processor_url: "http://127.0.0.1:9".to_string(),
        scoring_timeout_secs: 5,
        processor_cmd: vec!["true".to_string()],
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool and a throwaway storage root.
///
/// This mirrors the router construction in `main.rs` so integration
/// tests exercise the same middleware stack that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_storage(pool, std::env::temp_dir().join("swinglab-test-storage"))
}

/// Same as [`build_test_app`] but with an explicit storage root, for
/// tests that assert on persisted files.
pub fn build_test_app_with_storage(pool: PgPool, storage_root: PathBuf) -> Router {
    let config = test_config(storage_root);
    let scoring = Arc::new(ScoringClient::with_timeout(
        config.processor_url.clone(),
        Duration::from_secs(config.scoring_timeout_secs),
    ));
    let supervisor = ProcessorSupervisor::new(config.processor_cmd.clone());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        scoring,
        supervisor,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    request_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    request_json(app, "PUT", uri, body).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn delete_json(app: Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    request_json(app, "DELETE", uri, body).await
}

async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding helpers
// ---------------------------------------------------------------------------

/// Insert a video row and return its id.
pub async fn seed_video(pool: &PgPool, user_id: DbId, duration: i32) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO videos (title, file_path, file_size, duration, user_id) \
         VALUES ('swing session', 'uploads/videos/seed.mp4', 1024, $1, $2) \
         RETURNING id",
    )
    .bind(duration)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert a video row with an explicit creation time.
pub async fn seed_video_at(
    pool: &PgPool,
    user_id: DbId,
    duration: i32,
    created_at: chrono::DateTime<chrono::Utc>,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO videos (title, file_path, file_size, duration, user_id, created_at) \
         VALUES ('swing session', 'uploads/videos/seed.mp4', 1024, $1, $2, $3) \
         RETURNING id",
    )
    .bind(duration)
    .bind(user_id)
    .bind(created_at)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert an analysis row in an arbitrary state and return its id.
pub async fn seed_analysis(
    pool: &PgPool,
    video_id: DbId,
    hand: &str,
    status: &str,
    average_score: Option<f64>,
    score_arr: Option<serde_json::Value>,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO video_analyses \
             (video_id, hand_choice, status, average_score, score_arr) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(video_id)
    .bind(hand)
    .bind(status)
    .bind(average_score)
    .bind(score_arr)
    .fetch_one(pool)
    .await
    .unwrap()
}
