//! Storage backend factory: build the configured `ObjectStorage`.

use std::sync::Arc;

use clipshelf_core::{Config, StorageBackend};

use crate::local::LocalStorage;
use crate::s3::S3Storage;
use crate::traits::{ObjectStorage, StorageError, StorageResult};

/// Construct the object-storage backend selected by configuration.
///
/// `Config::validate` has already checked that the required settings for the
/// selected backend are present; missing values here are config errors.
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    match config.storage_backend {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not set".to_string()))?;
            let region = config
                .s3_region
                .clone()
                .ok_or_else(|| StorageError::ConfigError("S3_REGION not set".to_string()))?;

            let storage = S3Storage::new(bucket, region, config.s3_endpoint.clone())?;
            tracing::info!(backend = %StorageBackend::S3, "Object storage initialized");
            Ok(Arc::new(storage))
        }
        StorageBackend::Local => {
            let path = config.local_storage_path.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not set".to_string())
            })?;
            let base_url = config.local_storage_base_url.clone().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not set".to_string())
            })?;

            let storage = LocalStorage::new(path, base_url).await?;
            tracing::info!(backend = %StorageBackend::Local, "Object storage initialized");
            Ok(Arc::new(storage))
        }
    }
}
