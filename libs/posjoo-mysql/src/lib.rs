//! # Posjoo MySQL Adapter
//!
//! Implements the domain's `UserRepository` and `ProductRepository` ports on
//! a MySQL connection pool, with the schema shipped as embedded migrations.

pub mod infrastructure;

pub use infrastructure::{connect, run_migrations, MySqlProductRepository, MySqlUserRepository};
