//! Request and response bodies

pub mod error;
pub mod product;
pub mod user;
