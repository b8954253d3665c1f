//! Scratch staging for in-flight uploads.
//!
//! Every upload invocation stages its payload to a uniquely-named file in the
//! scratch directory and registers that file (and any derived artifact) with
//! a `ScratchGuard`. The guard removes every tracked file exactly once,
//! whether the invocation succeeds or fails.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

/// A configured scratch directory for staging uploads.
#[derive(Clone)]
pub struct ScratchDir {
    dir: PathBuf,
}

impl ScratchDir {
    pub async fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `data` to `{id}.{extension}` inside the scratch directory.
    /// The uuid provides the collision-avoiding entropy; the caller owns the
    /// returned path for the rest of the invocation.
    pub async fn stage(
        &self,
        id: Uuid,
        data: &[u8],
        extension: &str,
    ) -> std::io::Result<PathBuf> {
        let path = self.dir.join(format!("{}.{}", id, extension));
        fs::write(&path, data).await?;

        tracing::debug!(path = %path.display(), size_bytes = data.len(), "Upload staged");
        Ok(path)
    }
}

/// Tracks scratch files for one upload invocation and removes them on
/// cleanup. `cleanup` is idempotent: tracked paths are drained on the first
/// call, and files already gone are not an error. Cleanup failures are logged
/// rather than returned so they never replace the failure that aborted the
/// invocation.
#[derive(Default)]
pub struct ScratchGuard {
    files: Vec<PathBuf>,
}

impl ScratchGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for removal. Tracking a path that was never created is
    /// fine; cleanup tolerates absent files.
    pub fn track(&mut self, path: PathBuf) {
        self.files.push(path);
    }

    pub async fn cleanup(&mut self) {
        for path in self.files.drain(..) {
            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "Scratch file removed");
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove scratch file");
                }
            }
        }
    }
}

impl Drop for ScratchGuard {
    // Last-resort removal for panic and early-return paths that skipped
    // `cleanup`.
    fn drop(&mut self) {
        for path in self.files.drain(..) {
            let _ = std::fs::remove_file(path);
        }
    }
}
