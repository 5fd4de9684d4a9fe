//! `/api/files`: multipart upload and content-addressed download.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Extension, Multipart, Path,
    },
    http::{
        header::{CACHE_CONTROL, CONTENT_SECURITY_POLICY, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::common::{Actor, ApiError, Envelope};
use crate::domains::files::{fetch_file, store_upload};
use crate::kernel::StoredBlob;
use crate::server::app::AxumAppState;

const DOWNLOAD_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; sandbox";

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    #[serde(flatten)]
    pub blob: StoredBlob,
    /// Value to put in a binary field.
    pub url: String,
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("file is too large".to_string())
    } else {
        ApiError::validation(err.body_text())
    }
}

/// Store the first file part of a multipart body.
pub async fn upload_handler(
    Extension(state): Extension<AxumAppState>,
    Extension(actor): Extension<Actor>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Envelope<UploadedFile>>), ApiError> {
    state.authorize_write(&actor)?;
    let mut multipart = multipart.map_err(|rejection| ApiError::validation(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.file_name().is_none() && field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let declared = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let blob = store_upload(
            &state.deps,
            file_name.as_deref(),
            declared.as_deref(),
            bytes,
            state.max_upload_bytes,
        )
        .await?;
        let url = blob.url();

        return Ok((
            StatusCode::CREATED,
            Json(Envelope::ok(UploadedFile { blob, url }).with_message("File uploaded")),
        ));
    }

    Err(ApiError::validation("file is required"))
}

pub async fn download_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let blob = fetch_file(&state.deps, &id).await?;

    Ok((
        [
            (CONTENT_TYPE, blob.meta.content_type),
            (CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
            (X_CONTENT_TYPE_OPTIONS, "nosniff".to_string()),
            // SVG uploads must not run scripts on the API origin.
            (CONTENT_SECURITY_POLICY, DOWNLOAD_CSP.to_string()),
        ],
        blob.bytes,
    )
        .into_response())
}
