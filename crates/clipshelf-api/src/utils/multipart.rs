//! Common utilities for file upload handlers

use axum::extract::Multipart;
use clipshelf_core::AppError;

/// Uploaded file pulled out of a multipart form.
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

/// Extract file data, filename, and content type from a multipart form.
/// Only one field with the expected name is accepted; duplicates are
/// rejected. Unknown fields are skipped.
pub async fn extract_file_field(
    mut multipart: Multipart,
    field_name: &str,
) -> Result<UploadedFile, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        let name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if name == field_name {
            if file_data.is_some() {
                return Err(AppError::BadRequest(format!(
                    "Multiple '{}' fields are not allowed; send exactly one",
                    field_name
                )));
            }
            filename = field.file_name().map(|s: &str| s.to_string());
            content_type = field.content_type().map(|s: &str| s.to_string());

            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

            file_data = Some(data.to_vec());
        }
    }

    let data = file_data
        .ok_or_else(|| AppError::BadRequest(format!("No '{}' file provided", field_name)))?;

    Ok(UploadedFile {
        data,
        filename: filename.unwrap_or_else(|| "unknown".to_string()),
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
    })
}
