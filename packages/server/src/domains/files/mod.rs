//! Files domain - uploaded images and PDFs
//!
//! Uploads are stored by content address and referenced from binary fields
//! as `/api/files/<sha256>` instead of inline base64.

use bytes::Bytes;
use tracing::info;

use crate::common::ApiError;
use crate::domains::resources::models::{IMAGE, PDF};
use crate::kernel::{Blob, ServerDeps, StoredBlob};

/// Resolve the stored content type: an explicit, specific type wins,
/// otherwise guess from the file name.
pub fn content_type_for(file_name: Option<&str>, declared: Option<&str>) -> Option<String> {
    let declared = declared
        .map(|d| d.split(';').next().unwrap_or(d).trim().to_ascii_lowercase())
        .filter(|d| !d.is_empty() && d != "application/octet-stream");

    declared.or_else(|| {
        file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|mime| mime.essence_str().to_string())
    })
}

pub fn is_accepted(content_type: &str) -> bool {
    IMAGE.mime.contains(&content_type) || PDF.mime.contains(&content_type)
}

/// Validate and store one uploaded file.
pub async fn store_upload(
    deps: &ServerDeps,
    file_name: Option<&str>,
    declared: Option<&str>,
    bytes: Bytes,
    max_bytes: usize,
) -> Result<StoredBlob, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::validation("file is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "file exceeds the {} MB limit",
            max_bytes / (1024 * 1024)
        )));
    }

    let content_type = content_type_for(file_name, declared)
        .filter(|ct| is_accepted(ct))
        .ok_or_else(|| {
            ApiError::validation(format!(
                "file must be one of: {}, {}",
                IMAGE.mime.join(", "),
                PDF.mime.join(", ")
            ))
        })?;

    let stored = deps.blobs.put(&content_type, bytes).await?;

    info!(file_id = %stored.id, content_type = %stored.content_type, size = stored.size_bytes, "Stored upload");

    Ok(stored)
}

/// Fetch a stored file by its content address.
pub async fn fetch_file(deps: &ServerDeps, id: &str) -> Result<Blob, ApiError> {
    let well_formed = id.len() == 64 && id.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'));
    if !well_formed {
        return Err(ApiError::not_found("File not found"));
    }

    deps.blobs
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))
}
