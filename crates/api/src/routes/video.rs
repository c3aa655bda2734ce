//! Route definitions for the `/videos` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::{analysis, video};
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// GET    /                 -> list_videos
/// POST   /                 -> upload_video (multipart)
/// DELETE /                 -> delete_videos (batch)
/// GET    /{id}             -> get_video
/// PUT    /{id}             -> update_video
/// DELETE /{id}             -> delete_video
/// POST   /{id}/analysis    -> start_analysis
/// GET    /{id}/analysis    -> get_analysis
/// DELETE /{id}/analysis    -> delete_analysis
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(video::list_videos)
                .post(video::upload_video)
                .delete(video::delete_videos),
        )
        .route(
            "/{id}",
            get(video::get_video)
                .put(video::update_video)
                .delete(video::delete_video),
        )
        .route(
            "/{id}/analysis",
            get(analysis::get_analysis)
                .post(analysis::start_analysis)
                .delete(analysis::delete_analysis),
        )
        .layer(DefaultBodyLimit::max(video::MAX_UPLOAD_BYTES))
}
