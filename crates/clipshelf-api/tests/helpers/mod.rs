//! Test helpers: build AppState and router for integration tests.
//!
//! Postgres and the real media binaries are replaced at their seams: an
//! in-memory `VideoRepository`, a scripted `CommandRunner`, and tempdir-backed
//! local storage. Everything else is the production wiring.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use clipshelf_api::auth::JwtService;
use clipshelf_api::services::thumbnails::create_thumbnail_store;
use clipshelf_api::setup::build_router;
use clipshelf_api::state::AppState;
use clipshelf_core::config::ThumbnailPolicy;
use clipshelf_core::models::{NewVideo, Video};
use clipshelf_core::{AppError, Config, StorageBackend};
use clipshelf_db::VideoRepository;
use clipshelf_processing::{CommandRunner, ScratchDir, ToolOutput, UploadPipeline};
use clipshelf_storage::{LocalStorage, ObjectStorage};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const TEST_BASE_URL: &str = "http://test.local";

/// In-memory `VideoRepository` for tests.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, Video>>,
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, user_id: Uuid, new_video: NewVideo) -> Result<Video, AppError> {
        let now = Utc::now();
        let video = Video {
            id: Uuid::new_v4(),
            user_id,
            title: new_video.title,
            description: new_video.description,
            thumbnail_url: None,
            video_url: None,
            created_at: now,
            updated_at: now,
        };
        self.videos.write().await.insert(video.id, video.clone());
        Ok(video)
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn list_videos(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        let mut videos: Vec<Video> = self
            .videos
            .read()
            .await
            .values()
            .filter(|v| v.user_id == user_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut guard = self.videos.write().await;
        if !guard.contains_key(&video.id) {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }
        let mut updated = video.clone();
        updated.updated_at = Utc::now();
        guard.insert(video.id, updated);
        Ok(())
    }
}

/// Scripted stand-in for ffmpeg/ffprobe. ffmpeg copies input to output (or
/// fails when told to); ffprobe reports the configured dimensions. Every
/// invocation is recorded so tests can assert nothing was spawned.
pub struct FakeTools {
    pub dims: (u32, u32),
    pub fail_remux: AtomicBool,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTools {
    pub fn reporting(width: u32, height: u32) -> Self {
        Self {
            dims: (width, height),
            fail_remux: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl CommandRunner for FakeTools {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<ToolOutput> {
        self.calls.lock().unwrap().push(program.to_string());

        if program == "ffmpeg" {
            let output = args.last().unwrap();
            if self.fail_remux.load(Ordering::SeqCst) {
                std::fs::write(output, b"partial")?;
                return Ok(ToolOutput {
                    exit_code: Some(1),
                    success: false,
                    stdout: Vec::new(),
                    stderr: b"moov atom not found".to_vec(),
                });
            }
            let input = &args[1];
            std::fs::copy(input, output)?;
            return Ok(ToolOutput {
                exit_code: Some(0),
                success: true,
                stdout: Vec::new(),
                stderr: Vec::new(),
            });
        }

        let body = format!(
            r#"{{"streams":[{{"width":{},"height":{}}}]}}"#,
            self.dims.0, self.dims.1
        );
        Ok(ToolOutput {
            exit_code: Some(0),
            success: true,
            stdout: body.into_bytes(),
            stderr: Vec::new(),
        })
    }
}

/// Test application: server plus the seams tests poke at.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub tools: Arc<FakeTools>,
    pub jwt: JwtService,
    pub scratch_path: PathBuf,
    pub assets_path: PathBuf,
    pub storage_path: PathBuf,
    _scratch_dir: tempfile::TempDir,
    _assets_dir: tempfile::TempDir,
    _storage_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn bearer_for(&self, user_id: Uuid) -> String {
        self.jwt.issue_token(user_id).expect("issue token")
    }

    pub fn scratch_file_count(&self) -> usize {
        std::fs::read_dir(&self.scratch_path)
            .map(|d| d.count())
            .unwrap_or(0)
    }

    pub async fn create_draft(&self, user_id: Uuid, title: &str) -> Video {
        self.state
            .videos
            .create_video(
                user_id,
                NewVideo {
                    title: title.to_string(),
                    description: None,
                },
            )
            .await
            .expect("create draft")
    }
}

fn test_config(policy: ThumbnailPolicy, assets_dir: &std::path::Path, scratch: &std::path::Path) -> Config {
    Config {
        server_port: 0,
        database_url: "postgres://unused-in-tests".to_string(),
        db_max_connections: 1,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_hours: 24,
        environment: "test".to_string(),
        scratch_dir: scratch.to_string_lossy().to_string(),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: None,
        local_storage_base_url: None,
        public_base_url: TEST_BASE_URL.to_string(),
        thumbnail_policy: policy,
        assets_dir: assets_dir.to_string_lossy().to_string(),
        assets_base_url: format!("{}/assets", TEST_BASE_URL),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        // ceilings sit below the router body limit so oversize payloads reach
        // the validator, and small enough that the oversize tests stay cheap
        max_thumbnail_size_bytes: 3 << 20,
        max_video_size_bytes: 4 << 20,
    }
}

/// Setup test app with the given thumbnail policy and probe dimensions.
pub async fn setup_test_app(policy: ThumbnailPolicy, dims: (u32, u32)) -> TestApp {
    let scratch_dir = tempfile::tempdir().expect("scratch tempdir");
    let assets_dir = tempfile::tempdir().expect("assets tempdir");
    let storage_dir = tempfile::tempdir().expect("storage tempdir");

    let config = test_config(policy, assets_dir.path(), scratch_dir.path());

    let videos: Arc<dyn VideoRepository> = Arc::new(InMemoryVideoRepository::default());

    let storage: Arc<dyn ObjectStorage> = Arc::new(
        LocalStorage::new(
            storage_dir.path().to_path_buf(),
            format!("{}/assets/media", TEST_BASE_URL),
        )
        .await
        .expect("local storage"),
    );

    let thumbnails = create_thumbnail_store(&config)
        .await
        .expect("thumbnail store");

    let scratch = ScratchDir::new(scratch_dir.path().to_path_buf())
        .await
        .expect("scratch dir");

    let tools = Arc::new(FakeTools::reporting(dims.0, dims.1));
    let runner: Arc<dyn CommandRunner> = tools.clone();

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
        jwt: jwt.clone(),
        videos,
        storage,
        thumbnails,
        pipeline,
    });

    let server = TestServer::new(build_router(state.clone())).expect("test server");

    TestApp {
        server,
        state,
        tools,
        jwt,
        scratch_path: scratch_dir.path().to_path_buf(),
        assets_path: assets_dir.path().to_path_buf(),
        storage_path: storage_dir.path().to_path_buf(),
        _scratch_dir: scratch_dir,
        _assets_dir: assets_dir,
        _storage_dir: storage_dir,
    }
}
