//! Workspace-wide constants.

/// Prefix for all API routes.
pub const API_PREFIX: &str = "/api";

/// Maximum accepted thumbnail payload: 10 MiB.
pub const MAX_THUMBNAIL_SIZE_BYTES: usize = 10 << 20;

/// Maximum accepted video payload: 1 GiB.
pub const MAX_VIDEO_SIZE_BYTES: usize = 1 << 30;

/// The only media type accepted on the video upload path.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Media types accepted on the thumbnail upload path.
pub const THUMBNAIL_CONTENT_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/gif", "image/webp"];
