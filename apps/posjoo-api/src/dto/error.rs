//! Error body shared by every endpoint

use serde::Serialize;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Email is already registered")]
    pub error: String,
}

/// Multipart form of the photo endpoints
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct PhotoForm {
    /// A .jpg, .jpeg or .png file of at most 4MB
    #[schema(value_type = String, format = Binary)]
    pub photo: Vec<u8>,
}
