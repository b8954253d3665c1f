//! Video upload: validate, then run the upload pipeline (stage → fast-start
//! remux → probe → publish) and update the record.
//!
//! Validation is all-or-nothing and happens before any side effect: no
//! scratch file is written and no subprocess is spawned for a payload that
//! fails the checks. The record's `videoURL` is only updated after the
//! processed artifact is durably stored.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::Json;
use clipshelf_core::constants::VIDEO_CONTENT_TYPE;
use clipshelf_core::models::VideoResponse;
use clipshelf_db::VideoRepository;
use clipshelf_processing::validator::file_extension;
use clipshelf_processing::UploadValidator;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::fetch_owned_video;
use crate::state::AppState;
use crate::utils::multipart::extract_file_field;

#[utoipa::path(
    post,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = Uuid, Path, description = "Video id")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video uploaded and published", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let mut video = fetch_owned_video(state.videos.as_ref(), video_id, user_id).await?;

    let file = extract_file_field(multipart, "video").await?;

    let validator = UploadValidator::new(
        state.config.max_video_size_bytes,
        vec![VIDEO_CONTENT_TYPE.to_string()],
    );
    validator.validate(&file.content_type, file.data.len())?;
    let extension = file_extension(&file.filename)?;

    tracing::info!(
        video_id = %video_id,
        filename = %file.filename,
        size_bytes = file.data.len(),
        "Starting video upload pipeline"
    );

    let published = state.pipeline.publish_video(&file.data, &extension).await?;

    video.video_url = Some(published.url);
    state.videos.update_video(&video).await?;

    tracing::info!(
        video_id = %video.id,
        storage_key = %published.storage_key,
        aspect = %published.aspect,
        "Video upload completed"
    );

    Ok(Json(VideoResponse::from(video)))
}
