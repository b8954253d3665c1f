//! Draft video CRUD: create, get, list.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use clipshelf_core::models::{NewVideo, VideoResponse};
use clipshelf_core::AppError;
use clipshelf_db::VideoRepository;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::fetch_owned_video;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = NewVideo,
    responses(
        (status = 200, description = "Draft video created", body = VideoResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    ValidatedJson(new_video): ValidatedJson<NewVideo>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    if new_video.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title must not be empty".to_string()).into());
    }

    let video = state.videos.create_video(user_id, new_video).await?;
    Ok(Json(VideoResponse::from(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos", body = [VideoResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<VideoResponse>>, HttpAppError> {
    let videos = state.videos.list_videos(user_id).await?;
    Ok(Json(videos.into_iter().map(VideoResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(("video_id" = Uuid, Path, description = "Video id")),
    responses(
        (status = 200, description = "The video", body = VideoResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "No such video", body = ErrorResponse)
    )
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    AuthUser(user_id): AuthUser,
    Path(video_id): Path<Uuid>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video = fetch_owned_video(state.videos.as_ref(), video_id, user_id).await?;
    Ok(Json(VideoResponse::from(video)))
}
