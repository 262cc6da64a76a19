//! Product usecase - Business logic orchestration

use tracing::{debug, instrument};

use crate::{
    clock::{Clock, SystemClock},
    config::UsecaseConfig,
    error::{PosError, RepositoryError, Result},
    ids::{MerchantId, ProductId},
    product::{
        CreateProductParam, NewProduct, Product, ProductRepository, ProductUpdate,
        UpdateProductParam,
    },
    storage::{
        photo_filename, validate_photo, PhotoStorage, PhotoUpload, PRODUCT_PHOTO_DIRECTORY,
    },
};

/// Usecase for managing the inventory of a merchant
///
/// Same shape as `UserUsecase`, with the SKU unique per merchant instead of
/// a globally unique email, and no role rules.
pub struct ProductUsecase<R, S, C = SystemClock> {
    repository: R,
    storage: S,
    clock: C,
    config: UsecaseConfig,
}

impl<R, S> ProductUsecase<R, S>
where
    R: ProductRepository,
    S: PhotoStorage,
{
    pub fn new(repository: R, storage: S, config: UsecaseConfig) -> Self {
        Self::with_clock(repository, storage, config, SystemClock)
    }

    pub fn with_defaults(repository: R, storage: S) -> Self {
        Self::new(repository, storage, UsecaseConfig::default())
    }
}

impl<R, S, C> ProductUsecase<R, S, C>
where
    R: ProductRepository,
    S: PhotoStorage,
    C: Clock,
{
    pub fn with_clock(repository: R, storage: S, config: UsecaseConfig, clock: C) -> Self {
        Self {
            repository,
            storage,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &UsecaseConfig {
        &self.config
    }

    /// List the products of a merchant
    #[instrument(skip(self), err(level = "warn"))]
    pub async fn get_merchant_products(&self, merchant_id: MerchantId) -> Result<Vec<Product>> {
        let products = self.repository.get_by_merchant_id(merchant_id).await?;
        debug!(count = products.len(), "Listed merchant products");
        Ok(products)
    }

    #[instrument(skip(self), err(level = "warn"))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product> {
        Ok(self.repository.get_by_id(product_id).await?)
    }

    /// Register a product
    ///
    /// # Errors
    ///
    /// `PosError::InvalidData` if the merchant already has a product with this SKU
    #[instrument(
        skip(self, param),
        fields(sku = %param.sku, merchant_id = %param.merchant_id),
        err(level = "warn")
    )]
    pub async fn create_product(&self, param: CreateProductParam) -> Result<Product> {
        // Business rule: SKU is unique within the merchant
        let existing = self.find_by_sku(param.merchant_id, &param.sku).await?;
        if existing.is_some_and(|product| product.sku == param.sku) {
            return Err(sku_taken());
        }

        let new_product = NewProduct::from_param(param, self.clock.now());
        let product = self
            .repository
            .create(new_product)
            .await
            .map_err(classify_sku_conflict)?;

        debug!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Update a product and return the stored result
    ///
    /// # Errors
    ///
    /// - `PosError::NotFound` if no product has this id
    /// - `PosError::InvalidData` if another product of the merchant has the SKU
    #[instrument(skip(self, param), fields(sku = %param.sku), err(level = "warn"))]
    pub async fn update_product(
        &self,
        product_id: ProductId,
        param: UpdateProductParam,
    ) -> Result<Product> {
        let product = self.repository.get_by_id(product_id).await?;

        // Business rule: SKU is unique within the merchant
        let existing = self.find_by_sku(product.merchant_id, &param.sku).await?;
        if existing.is_some_and(|other| other.id != product.id && other.sku == param.sku) {
            return Err(sku_taken());
        }

        let update = ProductUpdate::from_param(param, self.clock.now());
        if let Err(err) = self.repository.update_by_id(product_id, update).await {
            return self
                .config
                .stale_update_policy
                .absorb(err, product)
                .map_err(classify_sku_conflict);
        }

        Ok(self.repository.get_by_id(product_id).await?)
    }

    /// Store a new product photo as `image/product/product-<id><ext>`
    ///
    /// Validation is identical to user photos.
    #[instrument(
        skip(self, photo),
        fields(filename = photo.as_ref().map(PhotoUpload::filename)),
        err(level = "warn")
    )]
    pub async fn update_product_photo(
        &self,
        product_id: ProductId,
        photo: Option<PhotoUpload>,
    ) -> Result<Product> {
        let product = self.repository.get_by_id(product_id).await?;

        let (photo, _) = validate_photo(photo.as_ref())?;
        let filename = photo_filename("product", product.id, photo);
        let url = self
            .storage
            .save(photo, PRODUCT_PHOTO_DIRECTORY, &filename)
            .await?;

        if let Err(err) = self
            .repository
            .update_photo_by_id(product_id, &url, self.clock.now())
            .await
        {
            return Ok(self.config.stale_update_policy.absorb(err, product)?);
        }

        debug!(url = %url, "Product photo updated");
        Ok(self.repository.get_by_id(product_id).await?)
    }

    #[instrument(skip(self), err(level = "warn"))]
    pub async fn delete_product(&self, product_id: ProductId) -> Result<()> {
        self.repository.delete_by_id(product_id).await?;
        debug!("Product deleted");
        Ok(())
    }

    async fn find_by_sku(&self, merchant_id: MerchantId, sku: &str) -> Result<Option<Product>> {
        match self.repository.get_by_sku(merchant_id, sku).await {
            Ok(product) => Ok(Some(product)),
            Err(RepositoryError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn sku_taken() -> PosError {
    PosError::invalid_data("SKU is already registered", "SKU is already registered")
}

fn classify_sku_conflict(err: RepositoryError) -> PosError {
    match err {
        RepositoryError::UniqueViolation { .. } => sku_taken(),
        other => other.into(),
    }
}
