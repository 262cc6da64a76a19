//! HTTP handlers

pub mod product;
pub mod user;

use axum::extract::Multipart;
use posjoo_domain::PhotoUpload;
use tracing::debug;

use crate::error::ApiError;

/// Name of the multipart field carrying the photo
pub const PHOTO_FIELD: &str = "photo";

/// Pull the photo out of a multipart body
///
/// A body without a `photo` field yields `None`; the usecase decides what
/// that means.
pub async fn read_photo(mut multipart: Multipart) -> Result<Option<PhotoUpload>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.body_text()))?
    {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(err.body_text()))?;

        debug!(filename = %filename, size = content.len(), "Received photo");
        return Ok(Some(PhotoUpload::new(filename, content)));
    }

    Ok(None)
}
