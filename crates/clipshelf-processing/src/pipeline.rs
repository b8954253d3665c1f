//! The video upload pipeline: stage → fast-start remux → probe → publish,
//! with scratch cleanup guaranteed on every exit path.
//!
//! One invocation writes at most one object to durable storage, and callers
//! only update the video record after `publish_video` returns successfully.

use std::sync::Arc;

use clipshelf_core::constants::VIDEO_CONTENT_TYPE;
use clipshelf_core::AppError;
use clipshelf_storage::{keys, ObjectStorage};
use uuid::Uuid;

use crate::aspect::AspectClass;
use crate::scratch::{ScratchDir, ScratchGuard};
use crate::tools::probe::StreamProbe;
use crate::tools::remux::FastStartRemuxer;
use crate::tools::CommandRunner;

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct PublishedVideo {
    pub id: Uuid,
    pub aspect: AspectClass,
    pub width: u32,
    pub height: u32,
    pub storage_key: String,
    pub url: String,
}

/// Stages a validated video payload, normalizes it for progressive playback,
/// classifies its aspect ratio, and publishes it to object storage.
///
/// The pipeline is strictly linear: staging completes before the remux
/// starts, the remux completes before the probe, the probe before
/// publication. Invocations are independent; nothing is shared between
/// concurrent runs except the storage backend.
pub struct UploadPipeline {
    scratch: ScratchDir,
    remuxer: FastStartRemuxer,
    probe: StreamProbe,
    storage: Arc<dyn ObjectStorage>,
}

impl UploadPipeline {
    pub fn new(
        scratch: ScratchDir,
        ffmpeg_path: String,
        ffprobe_path: String,
        runner: Arc<dyn CommandRunner>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            scratch,
            remuxer: FastStartRemuxer::new(ffmpeg_path, runner.clone()),
            probe: StreamProbe::new(ffprobe_path, runner),
            storage,
        }
    }

    /// Run the full pipeline for one validated payload. Scratch files are
    /// removed before this returns, success or failure.
    pub async fn publish_video(
        &self,
        data: &[u8],
        extension: &str,
    ) -> Result<PublishedVideo, AppError> {
        let id = Uuid::new_v4();
        let mut guard = ScratchGuard::new();

        let result = self.run(id, data, extension, &mut guard).await;
        guard.cleanup().await;

        result
    }

    async fn run(
        &self,
        id: Uuid,
        data: &[u8],
        extension: &str,
        guard: &mut ScratchGuard,
    ) -> Result<PublishedVideo, AppError> {
        let staged = self.scratch.stage(id, data, extension).await?;
        guard.track(staged.clone());

        // Track the artifact path before the remux runs; a failed run can
        // still leave a partial file behind.
        guard.track(self.remuxer.output_path(&staged));
        let processed = self.remuxer.remux(&staged).await?;

        let dims = self.probe.dimensions(&processed).await?;
        let aspect = AspectClass::from_dimensions(dims.width, dims.height);

        tracing::info!(
            video_file = %id,
            width = dims.width,
            height = dims.height,
            aspect = %aspect,
            "Video normalized and classified"
        );

        let bytes = tokio::fs::read(&processed).await?;
        let storage_key = keys::prefixed_key(aspect.as_str(), id, "mp4");

        self.storage
            .put(&storage_key, bytes, VIDEO_CONTENT_TYPE)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        let url = self.storage.public_url(&storage_key);

        tracing::info!(video_file = %id, key = %storage_key, url = %url, "Video published");

        Ok(PublishedVideo {
            id,
            aspect,
            width: dims.width,
            height: dims.height,
            storage_key,
            url,
        })
    }
}
