//! Application state shared by all handlers.

use std::sync::Arc;

use clipshelf_core::Config;
use clipshelf_db::VideoRepository;
use clipshelf_processing::UploadPipeline;
use clipshelf_storage::ObjectStorage;

use crate::auth::JwtService;
use crate::services::thumbnails::ThumbnailStore;

pub struct AppState {
    pub config: Config,
    pub jwt: JwtService,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn ObjectStorage>,
    pub thumbnails: Arc<dyn ThumbnailStore>,
    pub pipeline: Arc<UploadPipeline>,
}
