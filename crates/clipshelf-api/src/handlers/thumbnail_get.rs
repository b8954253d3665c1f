//! Serve thumbnail bytes for policies that hold them server-side.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use clipshelf_core::AppError;
use clipshelf_db::VideoRepository;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::thumbnails::ThumbnailStore;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/thumbnails/{video_id}",
    tag = "thumbnails",
    params(("video_id" = Uuid, Path, description = "Video id")),
    responses(
        (status = 200, description = "Thumbnail bytes"),
        (status = 404, description = "No video or no stored thumbnail", body = ErrorResponse)
    )
)]
pub async fn get_thumbnail(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<Uuid>,
) -> Result<Response, HttpAppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    // Under the data-url policy the bytes live inline on the record; there is
    // nothing to serve from here.
    let (data, content_type) = state.thumbnails.load(video.id).await?.ok_or_else(|| {
        AppError::NotFound(format!("No stored thumbnail for video {}", video_id))
    })?;

    Ok(([(header::CONTENT_TYPE, content_type)], data).into_response())
}
