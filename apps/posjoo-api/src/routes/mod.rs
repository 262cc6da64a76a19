//! API routes

pub mod product;
pub mod user;

use axum::Router;
use posjoo_domain::storage::MAX_PHOTO_SIZE;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::{
        error::{ErrorResponse, PhotoForm},
        product::{ProductRequest, ProductResponse},
        user::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse},
    },
    handlers, AppState,
};

/// Body limit of the photo upload routes
///
/// Leaves room above the photo size rule for the multipart framing, so an
/// oversized photo reaches the usecase and gets its error message.
pub const PHOTO_BODY_LIMIT: usize = MAX_PHOTO_SIZE as usize + 1024 * 1024;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::user::list_merchant_users,
        handlers::user::create_user,
        handlers::user::get_user,
        handlers::user::update_user,
        handlers::user::update_user_password,
        handlers::user::update_user_photo,
        handlers::user::delete_user,
        handlers::product::list_merchant_products,
        handlers::product::create_product,
        handlers::product::get_product,
        handlers::product::update_product,
        handlers::product::update_product_photo,
        handlers::product::delete_product,
        health_handler
    ),
    components(
        schemas(
            CreateUserRequest,
            UpdateUserRequest,
            UpdatePasswordRequest,
            UserResponse,
            ProductRequest,
            ProductResponse,
            PhotoForm,
            ErrorResponse
        )
    ),
    tags(
        (name = "users", description = "Staff accounts of a merchant"),
        (name = "products", description = "Inventory of a merchant"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Posjoo API",
        version = "0.1.0",
        description = "Point-of-sale back-office: users and products of merchants"
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(user::routes())
        .merge(product::routes())
        .route("/health", axum::routing::get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
