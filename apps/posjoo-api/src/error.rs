//! Mapping of usecase failures to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use posjoo_domain::{ErrorKind, PosError};
use tracing::{error, warn};

use crate::dto::error::ErrorResponse;

/// Error returned by every handler
#[derive(Debug)]
pub enum ApiError {
    /// The usecase rejected the request or failed
    Usecase(PosError),
    /// The request could not be decoded
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Usecase(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::InvalidData => StatusCode::BAD_REQUEST,
                ErrorKind::Forbidden => StatusCode::FORBIDDEN,
                ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl From<PosError> for ApiError {
    fn from(err: PosError) -> Self {
        Self::Usecase(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => {
                warn!(error = %message, "Rejected malformed request");
                message
            }
            Self::Usecase(err) => {
                if status.is_server_error() {
                    error!(cause = %err.cause(), "Request failed");
                }
                err.message().to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
