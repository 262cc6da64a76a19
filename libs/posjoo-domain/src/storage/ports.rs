//! Port for binary-object storage
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait` to keep dispatch static.

use std::future::Future;

use crate::{error::StorageError, storage::PhotoUpload};

/// Port for photo storage operations
///
/// This trait abstracts away the storage backend (S3, memory, etc.).
/// Implementations must:
/// - Store the bytes under `directory/filename`
/// - Overwrite any previous object with the same name
/// - Return the URL the stored file can be retrieved from
pub trait PhotoStorage: Send + Sync {
    /// Save a photo and return its retrieval URL
    ///
    /// # Arguments
    ///
    /// * `photo` - The uploaded photo
    /// * `directory` - Namespace such as `image/user`
    /// * `filename` - Deterministic name such as `user-12.png`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Failure` if the storage operation fails
    fn save(
        &self,
        photo: &PhotoUpload,
        directory: &str,
        filename: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}
