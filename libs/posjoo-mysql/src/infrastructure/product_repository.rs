//! MySQL Product Repository Implementation

use chrono::{DateTime, Utc};
use posjoo_domain::{
    product::{NewProduct, ProductUpdate},
    MerchantId, Product, ProductId, ProductRepository, RepositoryError,
};
use sqlx::{mysql::MySqlPool, query, query_as, FromRow};
use std::future::Future;
use tracing::{debug, instrument};

use super::error::{expect_affected, map_sqlx_error};

const ENTITY: &str = "Product";
const UNIQUE_FIELD: &str = "SKU";

const SELECT_BY_ID: &str = "SELECT id, name, sku, merchant_id, photo_url, price, stock, \
                            created_at, updated_at FROM products WHERE id = ?";
const SELECT_BY_SKU: &str = "SELECT id, name, sku, merchant_id, photo_url, price, stock, \
                             created_at, updated_at FROM products \
                             WHERE merchant_id = ? AND sku = ?";
const SELECT_BY_MERCHANT: &str = "SELECT id, name, sku, merchant_id, photo_url, price, stock, \
                                  created_at, updated_at FROM products \
                                  WHERE merchant_id = ? ORDER BY id";

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    sku: String,
    merchant_id: i64,
    photo_url: Option<String>,
    price: i64,
    stock: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            name: row.name,
            sku: row.sku,
            merchant_id: MerchantId::new(row.merchant_id),
            photo_url: row.photo_url,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// `ProductRepository` backed by the `products` table
///
/// The `uq_products_merchant_sku` constraint scopes SKU uniqueness to the
/// merchant.
#[derive(Debug, Clone)]
pub struct MySqlProductRepository {
    pool: MySqlPool,
}

impl MySqlProductRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn ensure_exists(&self, id: ProductId) -> Result<(), RepositoryError> {
        query("SELECT 1 FROM products WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?
            .map(|_| ())
            .ok_or(RepositoryError::not_found(ENTITY))
    }
}

impl ProductRepository for MySqlProductRepository {
    #[instrument(skip(self))]
    fn get_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        async move {
            query_as::<_, ProductRow>(SELECT_BY_ID)
                .bind(id.get())
                .fetch_one(&self.pool)
                .await
                .map(Product::from)
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))
        }
    }

    #[instrument(skip(self))]
    fn get_by_sku(
        &self,
        merchant_id: MerchantId,
        sku: &str,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        async move {
            query_as::<_, ProductRow>(SELECT_BY_SKU)
                .bind(merchant_id.get())
                .bind(sku)
                .fetch_one(&self.pool)
                .await
                .map(Product::from)
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))
        }
    }

    #[instrument(skip(self))]
    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send {
        async move {
            let rows = query_as::<_, ProductRow>(SELECT_BY_MERCHANT)
                .bind(merchant_id.get())
                .fetch_all(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            debug!(count = rows.len(), "Fetched merchant products");
            Ok(rows.into_iter().map(Product::from).collect())
        }
    }

    #[instrument(skip(self, product), fields(sku = %product.sku, merchant_id = %product.merchant_id))]
    fn create(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        async move {
            let result = query(
                "INSERT INTO products (name, sku, merchant_id, price, stock, created_at, \
                 updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&product.name)
            .bind(&product.sku)
            .bind(product.merchant_id.get())
            .bind(product.price)
            .bind(product.stock)
            .bind(product.created_at)
            .bind(product.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            let id = i64::try_from(result.last_insert_id())
                .map_err(|err| RepositoryError::backend(err.to_string()))?;
            debug!(product_id = id, "Inserted product");

            Ok(Product {
                id: ProductId::new(id),
                name: product.name,
                sku: product.sku,
                merchant_id: product.merchant_id,
                photo_url: None,
                price: product.price,
                stock: product.stock,
                created_at: product.created_at,
                updated_at: product.created_at,
            })
        }
    }

    #[instrument(skip(self, update), fields(sku = %update.sku))]
    fn update_by_id(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query(
                "UPDATE products SET name = ?, sku = ?, price = ?, stock = ?, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(&update.name)
            .bind(&update.sku)
            .bind(update.price)
            .bind(update.stock)
            .bind(update.updated_at)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            if result.rows_affected() == 0 {
                return self.ensure_exists(id).await;
            }
            Ok(())
        }
    }

    #[instrument(skip(self))]
    fn update_photo_by_id(
        &self,
        id: ProductId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query("UPDATE products SET photo_url = ?, updated_at = ? WHERE id = ?")
                .bind(photo_url)
                .bind(updated_at)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            if result.rows_affected() == 0 {
                return self.ensure_exists(id).await;
            }
            Ok(())
        }
    }

    #[instrument(skip(self))]
    fn delete_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query("DELETE FROM products WHERE id = ?")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            expect_affected(result.rows_affected(), ENTITY)
        }
    }
}
