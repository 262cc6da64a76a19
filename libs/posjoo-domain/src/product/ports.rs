//! Port trait for product persistence

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::{
    error::RepositoryError,
    ids::{MerchantId, ProductId},
    product::{NewProduct, Product, ProductUpdate},
};

/// Port for product persistence
///
/// Mirrors `UserRepository`, with the `(merchant_id, sku)` pair as the
/// unique key instead of the email. Zero rows affected by an update or
/// delete is `RepositoryError::NotFound`; a rejected duplicate SKU is
/// `RepositoryError::UniqueViolation`.
pub trait ProductRepository: Send + Sync {
    fn get_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// Look up a product by its merchant-scoped SKU
    fn get_by_sku(
        &self,
        merchant_id: MerchantId,
        sku: &str,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    /// List the products of a merchant; empty when it has none
    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send;

    fn create(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send;

    fn update_by_id(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_photo_by_id(
        &self,
        id: ProductId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn delete_by_id(&self, id: ProductId)
        -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
