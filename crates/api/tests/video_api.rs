mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

/// Build a multipart upload body from (name, filename, value) parts.
fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, value) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: video/mp4\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn post_multipart(
    app: axum::Router,
    uri: &str,
    body: Vec<u8>,
) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Upload persists the file and responds 201 with the pre-probe row.
#[sqlx::test(migrations = "../db/migrations")]
async fn upload_creates_video_and_persists_file(pool: PgPool) {
    let storage = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_storage(pool, storage.path().to_path_buf());

    let body = multipart_body(&[
        ("title", None, b"Morning swing"),
        ("user_id", None, b"7"),
        ("video", Some("clip.mp4"), b"not really mp4 bytes"),
    ]);
    let response = post_multipart(app, "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = common::body_json(response).await;
    assert_eq!(body["data"]["title"], "Morning swing");
    assert_eq!(body["data"]["user_id"], 7);
    assert_eq!(body["data"]["status"], "unprocessed");
    assert_eq!(body["data"]["duration"], 0);

    let file_path = body["data"]["file_path"].as_str().unwrap();
    assert!(file_path.starts_with("uploads/videos/"));
    assert!(file_path.ends_with(".mp4"));
    assert!(storage.path().join(file_path).exists());
}

/// Upload without the video file is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn upload_without_file_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = multipart_body(&[("title", None, b"No clip"), ("user_id", None, b"7")]);
    let response = post_multipart(app, "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Upload without a title is rejected.
#[sqlx::test(migrations = "../db/migrations")]
async fn upload_without_title_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = multipart_body(&[
        ("user_id", None, b"7"),
        ("video", Some("clip.mp4"), b"bytes"),
    ]);
    let response = post_multipart(app, "/api/v1/videos", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn get_nonexistent_video_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/videos/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Listing is owner-scoped and paginated, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_videos_scopes_by_owner(pool: PgPool) {
    common::seed_video(&pool, 1, 10).await;
    common::seed_video(&pool, 1, 20).await;
    common::seed_video(&pool, 2, 30).await;

    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/videos?user_id=1&page=1&limit=1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["total_pages"], 2);
    assert_eq!(body["data"]["videos"].as_array().unwrap().len(), 1);
}

/// Update replaces title/description and 404s for unknown ids.
#[sqlx::test(migrations = "../db/migrations")]
async fn update_video_details(pool: PgPool) {
    let video_id = common::seed_video(&pool, 1, 10).await;
    let app = common::build_test_app(pool);

    let response = common::put_json(
        app.clone(),
        &format!("/api/v1/videos/{video_id}"),
        &json!({"title": "Renamed", "description": "better form"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["description"], "better form");

    let response = common::put_json(
        app.clone(),
        &format!("/api/v1/videos/{video_id}"),
        &json!({"title": "   "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = common::put_json(
        app,
        "/api/v1/videos/999999",
        &json!({"title": "Renamed"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a video whose physical file is already gone still succeeds.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_video_tolerates_missing_file(pool: PgPool) {
    let video_id = common::seed_video(&pool, 1, 10).await;
    let app = common::build_test_app(pool.clone());

    let response = common::delete(app, &format!("/api/v1/videos/{video_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE id = $1")
        .bind(video_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

/// Deleting a video removes its analysis rows.
#[sqlx::test(migrations = "../db/migrations")]
async fn delete_video_cascades_to_analyses(pool: PgPool) {
    let video_id = common::seed_video(&pool, 1, 10).await;
    common::seed_analysis(&pool, video_id, "left", "completed", Some(80.0), None).await;
    common::seed_analysis(&pool, video_id, "right", "processing", None, None).await;

    let app = common::build_test_app(pool.clone());
    let response = common::delete(app, &format!("/api/v1/videos/{video_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM video_analyses WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_nonexistent_video_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::delete(app, "/api/v1/videos/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Batch delete reports one outcome per requested id instead of a
/// single collective success flag.
#[sqlx::test(migrations = "../db/migrations")]
async fn batch_delete_reports_per_item_outcomes(pool: PgPool) {
    let video_id = common::seed_video(&pool, 1, 10).await;

    let app = common::build_test_app(pool.clone());
    let response = common::delete_json(
        app,
        "/api/v1/videos",
        &json!({"video_ids": [video_id, 999999]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = common::body_json(response).await;
    let outcomes = body["data"].as_array().unwrap();
    assert_eq!(outcomes.len(), 2);

    assert_eq!(outcomes[0]["video_id"].as_i64().unwrap(), video_id);
    assert_eq!(outcomes[0]["deleted"], true);

    assert_eq!(outcomes[1]["video_id"], 999999);
    assert_eq!(outcomes[1]["deleted"], false);
    assert!(outcomes[1]["error"].as_str().unwrap().contains("not found"));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM videos WHERE id = $1")
        .bind(video_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn batch_delete_rejects_empty_list(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::delete_json(app, "/api/v1/videos", &json!({"video_ids": []})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
