//! Application setup: wire configuration into repositories, storage, the
//! upload pipeline, and the router.

pub mod routes;

use std::sync::Arc;

use axum::Router;
use clipshelf_core::Config;
use clipshelf_db::{PgVideoRepository, VideoRepository};
use clipshelf_processing::{CommandRunner, ScratchDir, SystemRunner, UploadPipeline};
use clipshelf_storage::create_storage;
use sqlx::postgres::PgPoolOptions;

use crate::auth::JwtService;
use crate::services::thumbnails::create_thumbnail_store;
use crate::state::AppState;

pub use routes::build_router;

/// Build the full application: database pool, storage backend, thumbnail
/// store, upload pipeline, and router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    config.validate()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("../../migrations").run(&pool).await?;

    let videos: Arc<dyn VideoRepository> = Arc::new(PgVideoRepository::new(pool));

    let storage = create_storage(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let thumbnails = create_thumbnail_store(&config).await?;

    let scratch = ScratchDir::new(config.scratch_dir.clone()).await?;
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let pipeline = Arc::new(UploadPipeline::new(
        scratch,
        config.ffmpeg_path.clone(),
        config.ffprobe_path.clone(),
        runner,
        storage.clone(),
    ));

    let jwt = JwtService::new(config.jwt_secret.clone(), config.jwt_expiry_hours);

    let state = Arc::new(AppState {
        config,
        jwt,
        videos,
        storage,
        thumbnails,
        pipeline,
    });

    let router = build_router(state.clone());
    Ok((state, router))
}

/// Bind and serve until shutdown.
pub async fn start_server(port: u16, router: Router) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port = port, "Server listening");
    axum::serve(listener, router).await?;
    Ok(())
}
