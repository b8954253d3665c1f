//! Storage abstraction trait
//!
//! All storage backends (S3, local filesystem) implement `ObjectStorage`.
//! The upload pipeline works against this trait and never sees backend
//! implementation details.

use async_trait::async_trait;
use clipshelf_core::StorageBackend;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Narrow object-storage interface.
///
/// `put` must be durable before it returns; callers only update resource
/// records after a successful `put`. `public_url` is pure string composition
/// and must be deterministic for a given key.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Write an object under `key`. Overwrites any existing object.
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()>;

    /// Read an object's bytes by key.
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// Delete an object by key.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check whether an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Publicly reachable URL for `key`.
    fn public_url(&self, key: &str) -> String;

    /// Which backend this is.
    fn backend_type(&self) -> StorageBackend;
}
