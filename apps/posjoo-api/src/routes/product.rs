//! Product routes

use axum::{extract::DefaultBodyLimit, routing::get, routing::put, Router};

use crate::{handlers::product, routes::PHOTO_BODY_LIMIT, AppState};

/// Create product routes
pub fn routes() -> Router<AppState> {
    let photo = Router::new()
        .route("/products/:id/photo", put(product::update_product_photo))
        .layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT));

    Router::new()
        .route(
            "/merchants/:merchant_id/products",
            get(product::list_merchant_products).post(product::create_product),
        )
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .merge(photo)
}
