//! In-memory port implementations
//!
//! Used by the test suites and for running the usecases without MySQL or S3.
//! The repositories enforce the same uniqueness constraints as the SQL
//! schema: a globally unique user email and a product SKU unique per merchant.

mod product;
mod storage;
mod user;

pub use product::InMemoryProductRepository;
pub use storage::InMemoryPhotoStorage;
pub use user::InMemoryUserRepository;
