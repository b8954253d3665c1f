//! Fast-start remux: rewrite the container so index atoms precede sample
//! data, without re-encoding and with metadata preserved. Players can then
//! begin playback before the whole file downloads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::{CommandRunner, ToolError};

/// Suffix appended to the staged path for the processed artifact.
pub const FAST_START_SUFFIX: &str = ".faststart.mp4";

/// Wrapper around the external ffmpeg binary for fast-start remuxing.
#[derive(Clone)]
pub struct FastStartRemuxer {
    ffmpeg_path: String,
    runner: Arc<dyn CommandRunner>,
}

impl FastStartRemuxer {
    pub fn new(ffmpeg_path: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            ffmpeg_path,
            runner,
        }
    }

    /// Path the processed artifact will be written to for a given input.
    /// Callers register this path for cleanup before invoking `remux`, so a
    /// partially-written artifact from a failed run is still removed.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        PathBuf::from(format!("{}{}", input.display(), FAST_START_SUFFIX))
    }

    /// Remux `input` into the fast-start layout. Streams are copied, not
    /// re-encoded, and container metadata is carried over.
    pub async fn remux(&self, input: &Path) -> Result<PathBuf, ToolError> {
        let output = self.output_path(input);

        let args = vec![
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            "-movflags".to_string(),
            "+faststart".to_string(),
            "-map_metadata".to_string(),
            "0".to_string(),
            "-f".to_string(),
            "mp4".to_string(),
            "-y".to_string(),
            output.to_string_lossy().to_string(),
        ];

        let result = self
            .runner
            .run(&self.ffmpeg_path, &args)
            .await
            .map_err(|source| ToolError::Launch {
                tool: "ffmpeg",
                source,
            })?;

        if !result.success {
            return Err(ToolError::Failed {
                tool: "ffmpeg",
                stderr: result.stderr_text(),
            });
        }

        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            "Fast-start remux completed"
        );

        Ok(output)
    }
}
