//! Photo uploads and the storage port they are saved through

mod photo;
mod ports;

pub use photo::{photo_filename, validate_photo, PhotoFormat, PhotoUpload, MAX_PHOTO_SIZE};
pub use ports::PhotoStorage;

/// Storage namespace for user photos
pub const USER_PHOTO_DIRECTORY: &str = "image/user";

/// Storage namespace for product photos
pub const PRODUCT_PHOTO_DIRECTORY: &str = "image/product";
