//! Shared key generation for storage backends.
//!
//! Published videos live under `{prefix}/{id}.{extension}` where the prefix
//! is the aspect class (`landscape`, `portrait`, `other`). The key is fully
//! determined by its inputs so the public URL can be recomputed at any time.

use uuid::Uuid;

/// Generate a storage key of the form `{prefix}/{id}.{extension}`.
pub fn prefixed_key(prefix: &str, id: Uuid, extension: &str) -> String {
    format!("{}/{}.{}", prefix, id, extension)
}
