//! Domain errors for usecase operations
//!
//! Every usecase returns a [`PosError`]. Callers branch on [`PosError::kind`]
//! instead of inspecting error identity. Ports report their own failures
//! through [`RepositoryError`] and [`StorageError`], which the usecases
//! classify into a [`PosError`].

use thiserror::Error;
use tracing::error;

/// Classification of a usecase failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The requested entity does not exist
    NotFound,
    /// The request violates a business rule
    InvalidData,
    /// The request violates an authorization rule
    Forbidden,
    /// Persistence or storage failed for a reason unrelated to the request
    Infrastructure,
}

/// Errors returned by the usecases
///
/// Each variant carries a human-readable `message` meant for the caller and
/// the underlying `cause` meant for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PosError {
    #[error("{message}")]
    NotFound { message: String, cause: String },

    #[error("{message}")]
    InvalidData { message: String, cause: String },

    #[error("{message}")]
    Forbidden { message: String, cause: String },

    #[error("{message}")]
    Infrastructure { message: String, cause: String },
}

impl PosError {
    /// Create a not found error
    pub fn not_found(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Create an invalid data error
    pub fn invalid_data(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::Infrastructure {
            message: message.into(),
            cause: cause.into(),
        }
    }

    /// Get the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::Infrastructure { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Get the caller-facing message
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message, .. }
            | Self::InvalidData { message, .. }
            | Self::Forbidden { message, .. }
            | Self::Infrastructure { message, .. } => message,
        }
    }

    /// Get the underlying cause
    pub fn cause(&self) -> &str {
        match self {
            Self::NotFound { cause, .. }
            | Self::InvalidData { cause, .. }
            | Self::Forbidden { cause, .. }
            | Self::Infrastructure { cause, .. } => cause,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Errors reported by repository adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No row matched the lookup, or an update/delete affected zero rows
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A unique constraint rejected the write
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// The backend failed
    #[error("Repository operation failed: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Create a not found error for the given entity name
    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }

    /// Create a unique violation error for the given field
    pub fn unique_violation(field: impl Into<String>) -> Self {
        Self::UniqueViolation {
            field: field.into(),
        }
    }

    /// Create a backend error with a message
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<RepositoryError> for PosError {
    fn from(err: RepositoryError) -> Self {
        let cause = err.to_string();
        match err {
            RepositoryError::NotFound { entity } => {
                PosError::not_found(format!("{entity} not found"), cause)
            }
            RepositoryError::UniqueViolation { field } => {
                PosError::invalid_data(format!("{field} is already registered"), cause)
            }
            RepositoryError::Backend(_) => {
                error!(cause = %cause, "Repository backend failure");
                PosError::infrastructure("Failed to access the repository", cause)
            }
        }
    }
}

/// Errors reported by photo storage adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Failed to store the file in the storage backend
    #[error("Storage operation failed: {0}")]
    Failure(String),
}

impl StorageError {
    /// Create a storage failure error with a message
    pub fn failure(msg: impl Into<String>) -> Self {
        Self::Failure(msg.into())
    }
}

impl From<StorageError> for PosError {
    fn from(err: StorageError) -> Self {
        error!(cause = %err, "Photo storage failure");
        PosError::infrastructure("Failed to store the photo", err.to_string())
    }
}

/// Result type alias for usecase operations
pub type Result<T> = std::result::Result<T, PosError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logs_of(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(PosError::not_found("a", "b").kind(), ErrorKind::NotFound);
        assert_eq!(PosError::invalid_data("a", "b").kind(), ErrorKind::InvalidData);
        assert_eq!(PosError::forbidden("a", "b").kind(), ErrorKind::Forbidden);
        assert_eq!(
            PosError::infrastructure("a", "b").kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn test_display_is_message() {
        let err = PosError::invalid_data("Email is already registered", "duplicate email");
        assert_eq!(err.to_string(), "Email is already registered");
        assert_eq!(err.cause(), "duplicate email");
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err: PosError = RepositoryError::not_found("User").into();
        assert!(err.is_not_found());
        assert_eq!(err.message(), "User not found");
    }

    #[test]
    fn test_unique_violation_maps_to_invalid_data() {
        let err: PosError = RepositoryError::unique_violation("SKU").into();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "SKU is already registered");
    }

    #[test]
    fn test_backend_failure_keeps_cause() {
        let err: PosError = RepositoryError::backend("connection reset").into();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(err.cause().contains("connection reset"));
    }

    #[test]
    fn test_storage_failure_maps_to_infrastructure() {
        let err: PosError = StorageError::failure("bucket missing").into();
        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert_eq!(
            err.cause(),
            "Storage operation failed: bucket missing"
        );
    }

    #[test]
    fn test_infrastructure_failures_log_at_error() {
        let logs = logs_of(|| {
            let _: PosError = RepositoryError::backend("connection reset").into();
            let _: PosError = StorageError::failure("bucket missing").into();
        });

        assert_eq!(logs.matches("ERROR").count(), 2, "{logs}");
        assert!(logs.contains("connection reset"));
        assert!(logs.contains("bucket missing"));
    }

    #[test]
    fn test_caller_errors_do_not_log_at_error() {
        let logs = logs_of(|| {
            let _: PosError = RepositoryError::not_found("User").into();
            let _: PosError = RepositoryError::unique_violation("Email").into();
        });

        assert!(!logs.contains("ERROR"), "{logs}");
    }
}
