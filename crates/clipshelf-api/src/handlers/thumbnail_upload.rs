//! Thumbnail upload: validate, store per the configured policy, update the
//! record.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use clipshelf_core::constants::THUMBNAIL_CONTENT_TYPES;
use clipshelf_core::models::VideoResponse;
use clipshelf_db::VideoRepository;
use clipshelf_processing::UploadValidator;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::fetch_owned_video;
use crate::services::thumbnails::ThumbnailStore;
use crate::state::AppState;
use crate::utils::multipart::extract_file_field;

#[utoipa::path(
    post,
    path = "/api/thumbnails/{video_id}",
    tag = "thumbnails",
    params(("video_id" = Uuid, Path, description = "Video id")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let mut video = fetch_owned_video(state.videos.as_ref(), video_id, user_id).await?;

    let file = extract_file_field(multipart, "thumbnail").await?;

    let validator = UploadValidator::new(
        state.config.max_thumbnail_size_bytes,
        THUMBNAIL_CONTENT_TYPES.iter().map(|s| s.to_string()).collect(),
    );
    validator.validate(&file.content_type, file.data.len())?;

    tracing::info!(
        video_id = %video_id,
        content_type = %file.content_type,
        size_bytes = file.data.len(),
        "Storing thumbnail"
    );

    let url = state
        .thumbnails
        .store(video_id, file.data, &file.content_type)
        .await?;

    video.thumbnail_url = Some(url);
    state.videos.update_video(&video).await?;

    Ok(Json(VideoResponse::from(video)))
}
