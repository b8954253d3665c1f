//! OpenAPI document for the HTTP surface.

use clipshelf_core::models::{NewVideo, VideoResponse};
use utoipa::OpenApi;

use crate::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::videos::create_video,
        crate::handlers::videos::list_videos,
        crate::handlers::videos::get_video,
        crate::handlers::video_upload::upload_video,
        crate::handlers::thumbnail_get::get_thumbnail,
        crate::handlers::thumbnail_upload::upload_thumbnail,
    ),
    components(schemas(NewVideo, VideoResponse, ErrorResponse)),
    tags(
        (name = "videos", description = "Video records and uploads"),
        (name = "thumbnails", description = "Thumbnail upload and retrieval")
    )
)]
pub struct ApiDoc;
