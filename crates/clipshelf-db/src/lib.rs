//! Persistence layer: the narrow `VideoRepository` seam and its Postgres
//! implementation. Handlers and the upload pipeline only ever see the trait.

mod video_repository;

pub use video_repository::{PgVideoRepository, VideoRepository};
