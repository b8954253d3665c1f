//! End-to-end tests for thumbnail upload and retrieval across the three
//! storage policies.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clipshelf_core::config::ThumbnailPolicy;
use clipshelf_core::models::VideoResponse;
use clipshelf_db::VideoRepository;
use helpers::{setup_test_app, TEST_BASE_URL};
use uuid::Uuid;

fn jpeg_part(data: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(data)
            .file_name("cover.jpg")
            .mime_type("image/jpeg"),
    )
}

#[tokio::test]
async fn test_memory_policy_roundtrip() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let token = app.bearer_for(user);
    let draft = app.create_draft(user, "with cover").await;

    // a realistic 2 MB JPEG payload
    let payload = vec![0xD8u8; 2 << 20];

    let response = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&token)
        .multipart(jpeg_part(payload.clone()))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: VideoResponse = response.json();
    assert_eq!(body.id, draft.id);
    assert_eq!(
        body.thumbnail_url.as_deref(),
        Some(format!("{}/api/thumbnails/{}", TEST_BASE_URL, draft.id).as_str())
    );

    // the bytes are served back with their content type
    let served = app
        .server
        .get(&format!("/api/thumbnails/{}", draft.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.header("content-type"), "image/jpeg");
    assert_eq!(served.as_bytes().len(), payload.len());
}

#[tokio::test]
async fn test_filesystem_policy_writes_asset_file() {
    let app = setup_test_app(ThumbnailPolicy::Filesystem, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let token = app.bearer_for(user);
    let draft = app.create_draft(user, "with cover").await;

    let body: VideoResponse = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&token)
        .multipart(jpeg_part(b"jpeg bytes".to_vec()))
        .await
        .json();

    assert_eq!(
        body.thumbnail_url.as_deref(),
        Some(format!("{}/assets/{}.jpg", TEST_BASE_URL, draft.id).as_str())
    );
    assert!(app.assets_path.join(format!("{}.jpg", draft.id)).exists());

    // the GET route can also serve fs-policy thumbnails
    let served = app
        .server
        .get(&format!("/api/thumbnails/{}", draft.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().to_vec(), b"jpeg bytes".to_vec());
}

#[tokio::test]
async fn test_data_url_policy_embeds_bytes_in_record() {
    let app = setup_test_app(ThumbnailPolicy::DataUrl, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let token = app.bearer_for(user);
    let draft = app.create_draft(user, "with cover").await;

    let form = MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(b"png bytes".to_vec())
            .file_name("cover.png")
            .mime_type("image/png"),
    );

    let body: VideoResponse = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&token)
        .multipart(form)
        .await
        .json();

    let url = body.thumbnail_url.expect("thumbnailURL set");
    assert!(url.starts_with("data:image/png;base64,"));
    let encoded = url.split(',').nth(1).unwrap();
    assert_eq!(BASE64.decode(encoded).unwrap(), b"png bytes");

    // nothing held server-side under this policy
    let served = app
        .server
        .get(&format!("/api/thumbnails/{}", draft.id))
        .await;
    assert_eq!(served.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_oversized_thumbnail_rejected() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let token = app.bearer_for(user);
    let draft = app.create_draft(user, "too big").await;

    let oversized = vec![0u8; app.state.config.max_thumbnail_size_bytes + 1];

    let response = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&token)
        .multipart(jpeg_part(oversized))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let video = app.state.videos.get_video(draft.id).await.unwrap().unwrap();
    assert!(video.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_non_image_thumbnail_rejected() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let token = app.bearer_for(user);
    let draft = app.create_draft(user, "wrong type").await;

    let form = MultipartForm::new().add_part(
        "thumbnail",
        Part::bytes(b"%PDF-1.4".to_vec())
            .file_name("cover.pdf")
            .mime_type("application/pdf"),
    );

    let response = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&token)
        .multipart(form)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_owner_cannot_set_thumbnail() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let draft = app.create_draft(owner, "someone else's").await;

    let response = app
        .server
        .post(&format!("/api/thumbnails/{}", draft.id))
        .authorization_bearer(&app.bearer_for(intruder))
        .multipart(jpeg_part(b"jpeg bytes".to_vec()))
        .await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let video = app.state.videos.get_video(draft.id).await.unwrap().unwrap();
    assert!(video.thumbnail_url.is_none());
}

#[tokio::test]
async fn test_get_thumbnail_for_missing_video_is_not_found() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;

    let response = app
        .server
        .get(&format!("/api/thumbnails/{}", Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_thumbnail_before_upload_is_not_found() {
    let app = setup_test_app(ThumbnailPolicy::Memory, (1920, 1080)).await;
    let user = Uuid::new_v4();
    let draft = app.create_draft(user, "no cover yet").await;

    let response = app
        .server
        .get(&format!("/api/thumbnails/{}", draft.id))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}
