//! # Posjoo S3 Adapter
//!
//! Implements the domain's `PhotoStorage` port on top of any S3-compatible
//! object store (AWS S3, MinIO).

pub mod infrastructure;

pub use infrastructure::{build_client, S3PhotoStorage};
