//! # Posjoo Domain Layer
//!
//! This crate contains the business logic of the Posjoo point-of-sale
//! back-office. It follows hexagonal architecture principles:
//!
//! - **Entities**: Users (staff accounts of a merchant) and Products (merchant inventory)
//! - **Ports**: Trait definitions for persistence (`UserRepository`, `ProductRepository`)
//!   and binary-object storage (`PhotoStorage`)
//! - **Usecases**: Validation, uniqueness and role rules orchestrated around the ports
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (MySQL, S3, HTTP, etc.).
//! All external dependencies are expressed as traits (ports) that are implemented
//! by adapter crates.
//!
//! ## Example
//!
//! ```rust
//! use posjoo_domain::memory::{InMemoryPhotoStorage, InMemoryUserRepository};
//! use posjoo_domain::user::{CreateUserParam, UserRole, UserUsecase};
//! use posjoo_domain::MerchantId;
//!
//! # async fn example() -> Result<(), posjoo_domain::PosError> {
//! let usecase = UserUsecase::with_defaults(
//!     InMemoryUserRepository::new(),
//!     InMemoryPhotoStorage::new("http://localhost:9000/posjoo"),
//! );
//!
//! let user = usecase
//!     .create_user(CreateUserParam {
//!         name: "Budi".to_string(),
//!         email: "budi@example.com".to_string(),
//!         role: UserRole::Staff,
//!         position: "Cashier".to_string(),
//!         password: "secret".to_string(),
//!         merchant_id: MerchantId::new(1),
//!     })
//!     .await?;
//! println!("Created user {}", user.id);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod memory;
pub mod password;
pub mod product;
pub mod storage;
pub mod user;

// Re-export commonly used types
pub use clock::{Clock, SystemClock};
pub use config::{RoleGuard, StaleUpdatePolicy, UsecaseConfig};
pub use error::{ErrorKind, PosError, RepositoryError, Result, StorageError};
pub use ids::{MerchantId, ProductId, UserId};
pub use password::PasswordHash;
pub use product::{Product, ProductRepository, ProductUsecase};
pub use storage::{PhotoFormat, PhotoStorage, PhotoUpload};
pub use user::{User, UserRepository, UserRole, UserUsecase};
