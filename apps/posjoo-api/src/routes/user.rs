//! User routes

use axum::{extract::DefaultBodyLimit, routing::get, routing::put, Router};

use crate::{handlers::user, routes::PHOTO_BODY_LIMIT, AppState};

/// Create user routes
pub fn routes() -> Router<AppState> {
    let photo = Router::new()
        .route("/users/:id/photo", put(user::update_user_photo))
        .layer(DefaultBodyLimit::max(PHOTO_BODY_LIMIT));

    Router::new()
        .route(
            "/merchants/:merchant_id/users",
            get(user::list_merchant_users).post(user::create_user),
        )
        .route(
            "/users/:id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/users/:id/password", put(user::update_user_password))
        .merge(photo)
}
