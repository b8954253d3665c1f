//! Thumbnail storage policies.
//!
//! Exactly one policy is selected at startup (`THUMBNAIL_POLICY`); they are
//! alternative deployments, not a fallback chain:
//!
//! - `memory`: process-local map keyed by video id. Lost on restart, not
//!   multi-instance-safe; served by `GET /api/thumbnails/{id}`.
//! - `data-url`: base64 data-URL embedded in the record's `thumbnailURL`.
//!   No server-side bytes; bloats the record and has practical size limits.
//! - `filesystem`: file under the assets directory, served by the static
//!   asset route.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clipshelf_core::config::ThumbnailPolicy;
use clipshelf_core::{AppError, Config};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Where thumbnail bytes live for one deployment.
///
/// `store` persists the bytes and returns the URL to write to the video
/// record. `load` returns bytes for policies that hold them server-side;
/// the data-url policy has nothing to serve and returns `None`.
#[async_trait]
pub trait ThumbnailStore: Send + Sync {
    async fn store(
        &self,
        video_id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError>;

    async fn load(&self, video_id: Uuid) -> Result<Option<(Vec<u8>, String)>, AppError>;
}

/// File extension for a thumbnail content type.
fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "bin",
    }
}

/// Process-local volatile storage addressed by video id.
#[derive(Default)]
pub struct MemoryThumbnailStore {
    base_url: String,
    entries: RwLock<HashMap<Uuid, (Vec<u8>, String)>>,
}

impl MemoryThumbnailStore {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ThumbnailStore for MemoryThumbnailStore {
    async fn store(
        &self,
        video_id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        self.entries
            .write()
            .await
            .insert(video_id, (data, content_type.to_string()));

        Ok(format!(
            "{}/api/thumbnails/{}",
            self.base_url.trim_end_matches('/'),
            video_id
        ))
    }

    async fn load(&self, video_id: Uuid) -> Result<Option<(Vec<u8>, String)>, AppError> {
        Ok(self.entries.read().await.get(&video_id).cloned())
    }
}

/// Inline data-URL storage: the URL itself carries the bytes.
#[derive(Default)]
pub struct DataUrlThumbnailStore;

#[async_trait]
impl ThumbnailStore for DataUrlThumbnailStore {
    async fn store(
        &self,
        _video_id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        Ok(format!(
            "data:{};base64,{}",
            content_type,
            BASE64.encode(data)
        ))
    }

    async fn load(&self, _video_id: Uuid) -> Result<Option<(Vec<u8>, String)>, AppError> {
        // bytes live inline on the record; nothing is held server-side
        Ok(None)
    }
}

/// Filesystem storage under the assets directory, served by the static route.
pub struct FileThumbnailStore {
    assets_dir: PathBuf,
    base_url: String,
}

impl FileThumbnailStore {
    pub async fn new(assets_dir: impl Into<PathBuf>, base_url: String) -> Result<Self, AppError> {
        let assets_dir = assets_dir.into();
        tokio::fs::create_dir_all(&assets_dir).await?;
        Ok(Self {
            assets_dir,
            base_url,
        })
    }

    fn file_name(video_id: Uuid, extension: &str) -> String {
        format!("{}.{}", video_id, extension)
    }
}

#[async_trait]
impl ThumbnailStore for FileThumbnailStore {
    async fn store(
        &self,
        video_id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let extension = extension_for(content_type);

        // a re-upload may change the content type; drop stale variants first
        for ext in ["jpg", "png", "gif", "webp", "bin"] {
            if ext != extension {
                let stale = self.assets_dir.join(Self::file_name(video_id, ext));
                match tokio::fs::remove_file(&stale).await {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => return Err(e.into()),
                }
            }
        }

        let file_name = Self::file_name(video_id, extension);
        tokio::fs::write(self.assets_dir.join(&file_name), data).await?;

        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            file_name
        ))
    }

    async fn load(&self, video_id: Uuid) -> Result<Option<(Vec<u8>, String)>, AppError> {
        for (ext, content_type) in [
            ("jpg", "image/jpeg"),
            ("png", "image/png"),
            ("gif", "image/gif"),
            ("webp", "image/webp"),
            ("bin", "application/octet-stream"),
        ] {
            let path = self.assets_dir.join(Self::file_name(video_id, ext));
            match tokio::fs::read(&path).await {
                Ok(data) => return Ok(Some((data, content_type.to_string()))),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(None)
    }
}

/// Build the thumbnail store selected by configuration.
pub async fn create_thumbnail_store(config: &Config) -> Result<Arc<dyn ThumbnailStore>, AppError> {
    let store: Arc<dyn ThumbnailStore> = match config.thumbnail_policy {
        ThumbnailPolicy::Memory => {
            Arc::new(MemoryThumbnailStore::new(config.public_base_url.clone()))
        }
        ThumbnailPolicy::DataUrl => Arc::new(DataUrlThumbnailStore),
        ThumbnailPolicy::Filesystem => Arc::new(
            FileThumbnailStore::new(config.assets_dir.clone(), config.assets_base_url.clone())
                .await?,
        ),
    };

    tracing::info!(policy = ?config.thumbnail_policy, "Thumbnail store initialized");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryThumbnailStore::new("http://localhost:8080".to_string());
        let id = Uuid::new_v4();

        let url = store
            .store(id, b"jpeg bytes".to_vec(), "image/jpeg")
            .await
            .expect("store");

        assert_eq!(url, format!("http://localhost:8080/api/thumbnails/{}", id));

        let (data, content_type) = store.load(id).await.unwrap().expect("entry");
        assert_eq!(data, b"jpeg bytes");
        assert_eq!(content_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_memory_store_miss_is_none() {
        let store = MemoryThumbnailStore::new("http://localhost:8080".to_string());
        assert!(store.load(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_data_url_store_embeds_bytes() {
        let store = DataUrlThumbnailStore;
        let id = Uuid::new_v4();

        let url = store
            .store(id, b"png bytes".to_vec(), "image/png")
            .await
            .expect("store");

        assert!(url.starts_with("data:image/png;base64,"));
        let encoded = url.split(',').nth(1).unwrap();
        assert_eq!(BASE64.decode(encoded).unwrap(), b"png bytes");

        // nothing is held server-side
        assert!(store.load(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_writes_under_assets_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileThumbnailStore::new(
            dir.path().to_path_buf(),
            "http://localhost:8080/assets".to_string(),
        )
        .await
        .expect("store");
        let id = Uuid::new_v4();

        let url = store
            .store(id, b"webp bytes".to_vec(), "image/webp")
            .await
            .expect("store");

        assert_eq!(url, format!("http://localhost:8080/assets/{}.webp", id));
        assert!(dir.path().join(format!("{}.webp", id)).exists());

        let (data, content_type) = store.load(id).await.unwrap().expect("entry");
        assert_eq!(data, b"webp bytes");
        assert_eq!(content_type, "image/webp");
    }

    #[tokio::test]
    async fn test_file_store_reupload_replaces_stale_variant() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileThumbnailStore::new(
            dir.path().to_path_buf(),
            "http://localhost:8080/assets".to_string(),
        )
        .await
        .expect("store");
        let id = Uuid::new_v4();

        store
            .store(id, b"old".to_vec(), "image/png")
            .await
            .expect("store png");
        store
            .store(id, b"new".to_vec(), "image/jpeg")
            .await
            .expect("store jpg");

        assert!(!dir.path().join(format!("{}.png", id)).exists());
        let (data, content_type) = store.load(id).await.unwrap().expect("entry");
        assert_eq!(data, b"new");
        assert_eq!(content_type, "image/jpeg");
    }
}
