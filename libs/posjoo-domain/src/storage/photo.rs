//! Uploaded photos and the rules they must satisfy

use bytes::Bytes;

use crate::error::{PosError, Result};

/// Largest accepted photo, in bytes ("4MB" as 4 × 1000 × 1024)
pub const MAX_PHOTO_SIZE: u64 = 4 * 1000 * 1024;

/// An uploaded photo as received from the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    filename: String,
    content: Bytes,
}

impl PhotoUpload {
    pub fn new(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    /// Client-supplied file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Size of the content in bytes
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Extension of the client file name including the leading dot, as uploaded
    ///
    /// Empty when the final path element has no dot.
    pub fn extension(&self) -> &str {
        file_extension(&self.filename)
    }
}

/// Accepted photo formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoFormat {
    Jpg,
    Jpeg,
    Png,
}

impl PhotoFormat {
    pub const ALL: [PhotoFormat; 3] = [PhotoFormat::Jpg, PhotoFormat::Jpeg, PhotoFormat::Png];

    /// Match an extension such as `.PNG`, ignoring case
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Match the extension of a file name, ignoring case
    pub fn from_filename(filename: &str) -> Option<Self> {
        Self::from_extension(file_extension(filename))
    }

    /// Canonical lowercase extension with the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpg => ".jpg",
            Self::Jpeg => ".jpeg",
            Self::Png => ".png",
        }
    }

    /// Largest accepted size for this format, in bytes
    pub fn max_size(self) -> u64 {
        match self {
            Self::Jpg | Self::Jpeg | Self::Png => MAX_PHOTO_SIZE,
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Jpg | Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Check an optional upload against the photo rules
///
/// Returns the upload and its detected format.
pub fn validate_photo(photo: Option<&PhotoUpload>) -> Result<(&PhotoUpload, PhotoFormat)> {
    let photo = photo.ok_or_else(|| {
        PosError::invalid_data("photo cannot be empty", "photo cannot be empty")
    })?;

    let format = PhotoFormat::from_extension(photo.extension()).ok_or_else(|| {
        PosError::invalid_data(
            "photo extension must be .jpg, .jpeg, or .png",
            format!("unsupported photo extension '{}'", photo.extension()),
        )
    })?;

    if photo.size() > format.max_size() {
        return Err(PosError::invalid_data(
            "Max photo size is 4MB",
            format!(
                "photo size ({} bytes) exceeds maximum ({} bytes)",
                photo.size(),
                format.max_size()
            ),
        ));
    }

    Ok((photo, format))
}

/// Deterministic storage file name, e.g. `user-12.png`
///
/// Repeated uploads for the same entity and extension overwrite each other.
pub fn photo_filename(prefix: &str, id: impl std::fmt::Display, photo: &PhotoUpload) -> String {
    format!("{}-{}{}", prefix, id, photo.extension())
}

fn file_extension(filename: &str) -> &str {
    let name = filename.rsplit('/').next().unwrap_or(filename);
    match name.rfind('.') {
        Some(index) => &name[index..],
        None => "",
    }
}
