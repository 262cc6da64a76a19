//! S3 Photo Storage Implementation
//!
//! This module implements the `PhotoStorage` port using an S3 bucket as the
//! backend. Photos are stored under `<directory>/<filename>` and served from a
//! public base URL.

use aws_sdk_s3::{primitives::ByteStream, Client};
use posjoo_domain::{PhotoFormat, PhotoStorage, PhotoUpload, StorageError};
use std::future::Future;
use tracing::{debug, error, info, instrument};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// S3-based implementation of the PhotoStorage port
///
/// ## Configuration
///
/// The storage requires:
/// - An AWS SDK S3 Client (configured with region, credentials, endpoint)
/// - The bucket name
/// - The public base URL objects of that bucket are reachable at, e.g.
///   `http://localhost:9000/posjoo`
///
/// ## Error Handling
///
/// All AWS SDK errors are converted to `StorageError::Failure`.
#[derive(Clone)]
pub struct S3PhotoStorage {
    client: Client,
    bucket: String,
    public_url: String,
}

impl S3PhotoStorage {
    /// Create a new S3 photo storage
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use posjoo_s3::{build_client, S3PhotoStorage};
    ///
    /// # async fn example() {
    /// let client = build_client(Some("http://localhost:9000"), "us-east-1").await;
    /// let storage = S3PhotoStorage::new(client, "posjoo", "http://localhost:9000/posjoo");
    /// # }
    /// ```
    pub fn new(client: Client, bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let public_url = public_url.into().trim_end_matches('/').to_string();
        info!(bucket = %bucket, public_url = %public_url, "Initializing S3PhotoStorage");
        Self {
            client,
            bucket,
            public_url,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key of a photo
    fn object_key(directory: &str, filename: &str) -> String {
        let directory = directory.trim_matches('/');
        if directory.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", directory, filename)
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    fn content_type(filename: &str) -> &'static str {
        PhotoFormat::from_filename(filename)
            .map(PhotoFormat::content_type)
            .unwrap_or(FALLBACK_CONTENT_TYPE)
    }
}

impl PhotoStorage for S3PhotoStorage {
    #[instrument(
        skip(self, photo),
        fields(bucket = %self.bucket, size = photo.size())
    )]
    fn save(
        &self,
        photo: &PhotoUpload,
        directory: &str,
        filename: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = Self::object_key(directory, filename);
        let url = self.object_url(&key);
        let content_type = Self::content_type(filename);
        let body = ByteStream::from(photo.content().clone());

        async move {
            debug!(key = %key, content_type = %content_type, "Uploading photo to S3");

            match client
                .put_object()
                .bucket(&bucket)
                .key(&key)
                .content_type(content_type)
                .body(body)
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %key, "Photo stored");
                    Ok(url)
                }
                Err(err) => {
                    error!(key = %key, error = ?err, "Failed to upload photo to S3");
                    Err(StorageError::failure(format!(
                        "S3 put_object failed for key '{}': {}",
                        key, err
                    )))
                }
            }
        }
    }
}
