//! Infrastructure implementations for S3 storage

mod s3_photo_storage;

pub use s3_photo_storage::S3PhotoStorage;

use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Region, Client};
use tracing::info;

/// Build an S3 client from the environment's credentials
///
/// With an `endpoint` the client talks to that server using path-style
/// addressing, as MinIO expects. Without one it targets AWS itself.
pub async fn build_client(endpoint: Option<&str>, region: &str) -> Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
    if let Some(endpoint) = endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;

    let config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(endpoint.is_some())
        .build();

    info!(endpoint = ?endpoint, region = %region, "S3 client configured");
    Client::from_conf(config)
}
