//! Object-storage backends for published assets.
//!
//! The `ObjectStorage` trait is the narrow seam the upload pipeline publishes
//! through; keys are opaque to the backend. Public URLs are derived by string
//! composition from the backend's base (bucket/region/endpoint or a local
//! serving base), so the same key always yields the same URL.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

pub use clipshelf_core::StorageBackend;
pub use factory::create_storage;
pub use keys::prefixed_key;
pub use local::LocalStorage;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
