//! Product handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use posjoo_domain::{
    product::{CreateProductParam, UpdateProductParam},
    MerchantId, ProductId,
};
use tracing::info;

use crate::{
    dto::{
        error::{ErrorResponse, PhotoForm},
        product::{ProductRequest, ProductResponse},
    },
    error::ApiError,
    handlers::read_photo,
    AppState,
};

#[utoipa::path(
    get,
    path = "/merchants/{merchant_id}/products",
    params(("merchant_id" = i64, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Products of the merchant", body = [ProductResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn list_merchant_products(
    State(state): State<AppState>,
    Path(merchant_id): Path<i64>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state
        .product_usecase
        .get_merchant_products(MerchantId::new(merchant_id))
        .await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Add a product to a merchant's inventory
#[utoipa::path(
    post,
    path = "/merchants/{merchant_id}/products",
    params(("merchant_id" = i64, Path, description = "Merchant id")),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "SKU already registered in the merchant", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Path(merchant_id): Path<i64>,
    Json(payload): Json<ProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let param = CreateProductParam {
        name: payload.name,
        sku: payload.sku,
        merchant_id: MerchantId::new(merchant_id),
        price: payload.price,
        stock: payload.stock,
    };

    let product = state.product_usecase.create_product(param).await?;
    info!(product_id = %product.id, "Product created");
    Ok((StatusCode::CREATED, Json(product.into())))
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.product_usecase.get_product(ProductId::new(id)).await?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 400, description = "SKU already registered in the merchant", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductRequest>,
) -> Result<Json<ProductResponse>, ApiError> {
    let param = UpdateProductParam {
        name: payload.name,
        sku: payload.sku,
        price: payload.price,
        stock: payload.stock,
    };

    let product = state
        .product_usecase
        .update_product(ProductId::new(id), param)
        .await?;
    Ok(Json(product.into()))
}

#[utoipa::path(
    put,
    path = "/products/{id}/photo",
    params(("id" = i64, Path, description = "Product id")),
    request_body(content = PhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product with the new photo URL", body = ProductResponse),
        (status = 400, description = "Missing, unsupported or oversized photo", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn update_product_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ProductResponse>, ApiError> {
    let photo = read_photo(multipart).await?;
    let product = state
        .product_usecase
        .update_product_photo(ProductId::new(id), photo)
        .await?;

    Ok(Json(product.into()))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = ErrorResponse)
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.product_usecase.delete_product(ProductId::new(id)).await?;
    info!(product_id = id, "Product deleted");
    Ok(StatusCode::NO_CONTENT)
}
