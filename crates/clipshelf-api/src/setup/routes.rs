//! Route table and middleware stack.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api_doc::ApiDoc;
use crate::handlers::{thumbnail_get, thumbnail_upload, video_upload, videos};
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    // The body limit must sit above the video ceiling so oversized payloads
    // reach the validator and fail with the taxonomy's 400, not a generic 413.
    let body_limit = state.config.max_video_size_bytes + (1 << 20);
    let assets_dir = state.config.assets_dir.clone();

    Router::new()
        .route(
            "/api/videos",
            axum::routing::post(videos::create_video).get(videos::list_videos),
        )
        .route(
            "/api/videos/{video_id}",
            get(videos::get_video).post(video_upload::upload_video),
        )
        .route(
            "/api/thumbnails/{video_id}",
            get(thumbnail_get::get_thumbnail).post(thumbnail_upload::upload_thumbnail),
        )
        .route("/api-docs/openapi.json", get(openapi_json))
        .with_state(state)
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
