//! Stream metadata probe: pixel dimensions of the first video stream via
//! the external ffprobe binary.

use std::path::Path;
use std::sync::Arc;

use super::{CommandRunner, ToolError};

/// Pixel dimensions of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

/// Wrapper around the external ffprobe binary.
#[derive(Clone)]
pub struct StreamProbe {
    ffprobe_path: String,
    runner: Arc<dyn CommandRunner>,
}

impl StreamProbe {
    pub fn new(ffprobe_path: String, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            ffprobe_path,
            runner,
        }
    }

    /// Width and height of the first video stream in `path`.
    ///
    /// A missing stream or non-positive dimensions fail the invocation; a
    /// file ffprobe cannot read is not a video we can publish.
    pub async fn dimensions(&self, path: &Path) -> Result<VideoDimensions, ToolError> {
        let args = vec![
            "-v".to_string(),
            "error".to_string(),
            "-select_streams".to_string(),
            "v:0".to_string(),
            "-show_entries".to_string(),
            "stream=width,height".to_string(),
            "-of".to_string(),
            "json".to_string(),
            path.to_string_lossy().to_string(),
        ];

        let result = self
            .runner
            .run(&self.ffprobe_path, &args)
            .await
            .map_err(|source| ToolError::Launch {
                tool: "ffprobe",
                source,
            })?;

        if !result.success {
            return Err(ToolError::Failed {
                tool: "ffprobe",
                stderr: result.stderr_text(),
            });
        }

        let parsed: serde_json::Value =
            serde_json::from_slice(&result.stdout).map_err(|e| ToolError::Unparseable {
                tool: "ffprobe",
                detail: e.to_string(),
            })?;

        let stream = parsed["streams"]
            .get(0)
            .ok_or_else(|| ToolError::Unparseable {
                tool: "ffprobe",
                detail: "no video stream found".to_string(),
            })?;

        let width = stream["width"].as_u64().ok_or_else(|| ToolError::Unparseable {
            tool: "ffprobe",
            detail: "could not parse stream width".to_string(),
        })?;
        let height = stream["height"]
            .as_u64()
            .ok_or_else(|| ToolError::Unparseable {
                tool: "ffprobe",
                detail: "could not parse stream height".to_string(),
            })?;

        if width == 0 || height == 0 || width > u32::MAX as u64 || height > u32::MAX as u64 {
            return Err(ToolError::Unparseable {
                tool: "ffprobe",
                detail: format!("invalid stream dimensions {}x{}", width, height),
            });
        }

        Ok(VideoDimensions {
            width: width as u32,
            height: height as u32,
        })
    }
}
