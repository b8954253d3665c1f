//! Upload processing: payload validation, scratch staging with guaranteed
//! cleanup, external media-tool wrappers (fast-start remux, stream probe),
//! aspect classification, and the video upload pipeline that ties them
//! together.

pub mod aspect;
pub mod pipeline;
pub mod scratch;
pub mod tools;
pub mod validator;

pub use aspect::AspectClass;
pub use pipeline::{PublishedVideo, UploadPipeline};
pub use scratch::{ScratchDir, ScratchGuard};
pub use tools::probe::{StreamProbe, VideoDimensions};
pub use tools::remux::FastStartRemuxer;
pub use tools::{CommandRunner, SystemRunner, ToolError, ToolOutput};
pub use validator::{UploadValidator, ValidationError};
