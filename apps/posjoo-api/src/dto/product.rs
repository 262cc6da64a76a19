//! DTOs for product endpoints

use chrono::{DateTime, Utc};
use posjoo_domain::Product;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating or updating a product
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    #[schema(example = "Es Kopi Susu")]
    pub name: String,
    /// Unique within the merchant
    #[schema(example = "KOPI-001")]
    pub sku: String,
    #[schema(example = 18000)]
    pub price: i64,
    #[schema(example = 25)]
    pub stock: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub merchant_id: i64,
    pub photo_url: Option<String>,
    pub price: i64,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.get(),
            name: product.name,
            sku: product.sku,
            merchant_id: product.merchant_id.get(),
            photo_url: product.photo_url,
            price: product.price,
            stock: product.stock,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}
