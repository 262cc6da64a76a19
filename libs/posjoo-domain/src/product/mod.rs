//! Product domain module
//!
//! Merchant inventory: the entity, its persistence port and the usecase
//! enforcing per-merchant SKU uniqueness and photo uploads.

mod entity;
mod ports;
mod service;

pub use entity::{CreateProductParam, NewProduct, Product, ProductUpdate, UpdateProductParam};
pub use ports::ProductRepository;
pub use service::ProductUsecase;
