//! Product entity and request payloads

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ids::{MerchantId, ProductId};

/// An inventory item of a merchant
///
/// `price` and `stock` are carried through untouched by the usecases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Unique within the merchant, not globally
    pub sku: String,
    pub merchant_id: MerchantId,
    pub photo_url: Option<String>,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of `create_product`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProductParam {
    pub name: String,
    pub sku: String,
    pub merchant_id: MerchantId,
    pub price: i64,
    pub stock: i64,
}

/// Payload of `update_product`
///
/// The merchant of a product never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProductParam {
    pub name: String,
    pub sku: String,
    pub price: i64,
    pub stock: i64,
}

/// Record handed to the repository to insert a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub merchant_id: MerchantId,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    pub fn from_param(param: CreateProductParam, created_at: DateTime<Utc>) -> Self {
        Self {
            name: param.name,
            sku: param.sku,
            merchant_id: param.merchant_id,
            price: param.price,
            stock: param.stock,
            created_at,
        }
    }
}

/// Record handed to the repository to update a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub sku: String,
    pub price: i64,
    pub stock: i64,
    pub updated_at: DateTime<Utc>,
}

impl ProductUpdate {
    pub fn from_param(param: UpdateProductParam, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: param.name,
            sku: param.sku,
            price: param.price,
            stock: param.stock,
            updated_at,
        }
    }
}
