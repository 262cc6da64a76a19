use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::RepositoryError,
    ids::{MerchantId, ProductId},
    product::{NewProduct, Product, ProductRepository, ProductUpdate},
};

const ENTITY: &str = "Product";

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<ProductId, Product>,
}

impl Table {
    fn sku_taken(&self, merchant_id: MerchantId, sku: &str, except: Option<ProductId>) -> bool {
        self.rows.values().any(|product| {
            product.merchant_id == merchant_id && product.sku == sku && Some(product.id) != except
        })
    }

    fn row_mut(&mut self, id: ProductId) -> Result<&mut Product, RepositoryError> {
        self.rows
            .get_mut(&id)
            .ok_or(RepositoryError::not_found(ENTITY))
    }
}

/// `ProductRepository` backed by a map
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a product as-is, bypassing the usecase rules
    pub fn seed(&self, product: Product) {
        let mut table = self.lock();
        table.last_id = table.last_id.max(product.id.get());
        table.rows.insert(product.id, product);
    }

    /// Number of stored products
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn get_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }

    fn get_by_sku(
        &self,
        merchant_id: MerchantId,
        sku: &str,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .values()
            .find(|product| product.merchant_id == merchant_id && product.sku == sku)
            .cloned()
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }

    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<Product>, RepositoryError>> + Send {
        let products = self
            .lock()
            .rows
            .values()
            .filter(|product| product.merchant_id == merchant_id)
            .cloned()
            .collect();
        ready(Ok(products))
    }

    fn create(
        &self,
        product: NewProduct,
    ) -> impl Future<Output = Result<Product, RepositoryError>> + Send {
        let mut table = self.lock();
        let result = if table.sku_taken(product.merchant_id, &product.sku, None) {
            Err(RepositoryError::unique_violation("SKU"))
        } else {
            table.last_id += 1;
            let created = Product {
                id: ProductId::new(table.last_id),
                name: product.name,
                sku: product.sku,
                merchant_id: product.merchant_id,
                photo_url: None,
                price: product.price,
                stock: product.stock,
                created_at: product.created_at,
                updated_at: product.created_at,
            };
            table.rows.insert(created.id, created.clone());
            Ok(created)
        };
        ready(result)
    }

    fn update_by_id(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let mut table = self.lock();
        let merchant_id = table.rows.get(&id).map(|product| product.merchant_id);
        let result = match merchant_id {
            Some(merchant_id) if table.sku_taken(merchant_id, &update.sku, Some(id)) => {
                Err(RepositoryError::unique_violation("SKU"))
            }
            _ => table.row_mut(id).map(|product| {
                product.name = update.name;
                product.sku = update.sku;
                product.price = update.price;
                product.stock = update.stock;
                product.updated_at = update.updated_at;
            }),
        };
        ready(result)
    }

    fn update_photo_by_id(
        &self,
        id: ProductId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self.lock().row_mut(id).map(|product| {
            product.photo_url = Some(photo_url.to_string());
            product.updated_at = updated_at;
        });
        ready(result)
    }

    fn delete_by_id(
        &self,
        id: ProductId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }
}
