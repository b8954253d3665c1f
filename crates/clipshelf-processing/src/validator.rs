use std::path::Path;

/// Common validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing file extension (filename: {0})")]
    MissingExtension(String),

    #[error("Empty file")]
    EmptyFile,
}

/// Normalize a MIME type by stripping parameters
/// (e.g. "video/mp4; codecs=avc1" -> "video/mp4").
fn normalize_content_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Lowercased extension of `filename`, used for scratch-file naming.
pub fn file_extension(filename: &str) -> Result<String, ValidationError> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ValidationError::MissingExtension(filename.to_string()))
}

/// Upload payload validator
///
/// All checks run before any side effect; a payload is either fully accepted
/// or rejected outright.
pub struct UploadValidator {
    max_file_size: usize,
    allowed_content_types: Vec<String>,
}

impl UploadValidator {
    pub fn new(max_file_size: usize, allowed_content_types: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_content_types,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the declared content type against the allowlist. Parameters
    /// are stripped before comparison so "video/mp4; codecs=..." cannot
    /// bypass an exact-match allowlist.
    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        let normalized = normalize_content_type(content_type).to_lowercase();

        if !self
            .allowed_content_types
            .iter()
            .any(|ct| ct.to_lowercase() == normalized)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Validate all aspects of an upload: size first, then content type.
    pub fn validate(&self, content_type: &str, file_size: usize) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_content_type(content_type)?;
        Ok(())
    }
}
