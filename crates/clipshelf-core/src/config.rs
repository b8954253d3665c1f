//! Configuration module
//!
//! Environment-driven configuration for the API server. `Config::from_env`
//! reads everything once at startup (a `.env` file is honored via dotenvy);
//! `validate` rejects combinations that cannot work before the server binds.

use std::env;
use std::str::FromStr;

use crate::constants;
use crate::storage_types::StorageBackend;

/// How uploaded thumbnails are kept once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailPolicy {
    /// Process-local map keyed by video id. Lost on restart.
    Memory,
    /// Base64 data-URL embedded in the video record.
    DataUrl,
    /// File under `assets_dir`, served by the static asset route.
    Filesystem,
}

impl FromStr for ThumbnailPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(ThumbnailPolicy::Memory),
            "data-url" | "dataurl" => Ok(ThumbnailPolicy::DataUrl),
            "filesystem" | "fs" => Ok(ThumbnailPolicy::Filesystem),
            other => Err(format!(
                "Unknown thumbnail policy '{}' (expected 'memory', 'data-url', or 'filesystem')",
                other
            )),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub environment: String,

    // Scratch space for in-flight uploads
    pub scratch_dir: String,

    // Object storage
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,

    // Public base URL of this server (used to compose thumbnail URLs)
    pub public_base_url: String,

    // Thumbnails
    pub thumbnail_policy: ThumbnailPolicy,
    pub assets_dir: String,
    pub assets_base_url: String,

    // External media tools
    pub ffmpeg_path: String,
    pub ffprobe_path: String,

    // Upload ceilings
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env if present; real environment always wins.
        dotenvy::dotenv().ok();

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<StorageBackend>()
            .map_err(anyhow::Error::msg)?;

        let thumbnail_policy = env::var("THUMBNAIL_POLICY")
            .unwrap_or_else(|_| "filesystem".to_string())
            .parse::<ThumbnailPolicy>()
            .map_err(anyhow::Error::msg)?;

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
            scratch_dir: env::var("SCRATCH_DIR").unwrap_or_else(|_| "/tmp/clipshelf".to_string()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            thumbnail_policy,
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "./assets".to_string()),
            assets_base_url: env::var("ASSETS_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080/assets".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            max_thumbnail_size_bytes: env::var("MAX_THUMBNAIL_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(constants::MAX_THUMBNAIL_SIZE_BYTES),
            max_video_size_bytes: env::var("MAX_VIDEO_SIZE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(constants::MAX_VIDEO_SIZE_BYTES),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes");
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() || self.s3_region.is_none() {
                    anyhow::bail!("S3_BUCKET and S3_REGION must be set for the s3 backend");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() || self.local_storage_base_url.is_none() {
                    anyhow::bail!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for the local backend"
                    );
                }
            }
        }

        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            anyhow::bail!("Upload size ceilings must be non-zero");
        }

        Ok(())
    }
}
