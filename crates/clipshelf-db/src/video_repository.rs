//! Video repository: get / list / create / update against Postgres.

use async_trait::async_trait;
use clipshelf_core::models::{NewVideo, Video};
use clipshelf_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Narrow persistence interface for video records.
///
/// Single-record reads and writes; the database provides atomicity for each
/// call. No cross-record coordination happens here.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// Create a draft video owned by `user_id`. Asset URLs start empty.
    async fn create_video(&self, user_id: Uuid, new_video: NewVideo) -> Result<Video, AppError>;

    /// Fetch one video by id, or `None` if absent.
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// All videos owned by `user_id`, newest first.
    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError>;

    /// Persist the mutable fields of an existing video.
    async fn update_video(&self, video: &Video) -> Result<(), AppError>;
}

/// Postgres-backed `VideoRepository`.
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    async fn create_video(&self, user_id: Uuid, new_video: NewVideo) -> Result<Video, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (id, user_id, title, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, thumbnail_url, video_url,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&new_video.title)
        .bind(&new_video.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %video.id, user_id = %user_id, "Video record created");
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url,
                   created_at, updated_at
            FROM videos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(videos)
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET title = $2,
                description = $3,
                thumbnail_url = $4,
                video_url = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }

        Ok(())
    }
}
