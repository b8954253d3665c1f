pub mod thumbnail_get;
pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use clipshelf_core::models::Video;
use clipshelf_core::AppError;
use clipshelf_db::VideoRepository;
use uuid::Uuid;

/// Resolve a video and enforce ownership: absent → 404, owned by someone
/// else → 403. The 403 is returned regardless of payload validity, so a
/// non-owner can never distinguish "exists" from "would have failed anyway".
pub(crate) async fn fetch_owned_video(
    videos: &dyn VideoRepository,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", video_id)))?;

    if video.user_id != user_id {
        return Err(AppError::Forbidden("You do not own this video".to_string()));
    }

    Ok(video)
}
