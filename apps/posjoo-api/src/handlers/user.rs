//! User handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use posjoo_domain::{
    user::{CreateUserParam, UpdateUserParam, UpdateUserPasswordParam},
    MerchantId, UserId, UserRole,
};
use tracing::info;

use crate::{
    dto::{
        error::{ErrorResponse, PhotoForm},
        user::{CreateUserRequest, UpdatePasswordRequest, UpdateUserRequest, UserResponse},
    },
    error::ApiError,
    handlers::read_photo,
    AppState,
};

fn parse_role(role: &str) -> Result<UserRole, ApiError> {
    role.parse()
        .map_err(|_| ApiError::bad_request(format!("Unknown role '{role}'")))
}

/// List the users of a merchant
#[utoipa::path(
    get,
    path = "/merchants/{merchant_id}/users",
    params(("merchant_id" = i64, Path, description = "Merchant id")),
    responses(
        (status = 200, description = "Users of the merchant", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_merchant_users(
    State(state): State<AppState>,
    Path(merchant_id): Path<i64>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state
        .user_usecase
        .get_merchant_users(MerchantId::new(merchant_id))
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Register a user in a merchant
#[utoipa::path(
    post,
    path = "/merchants/{merchant_id}/users",
    params(("merchant_id" = i64, Path, description = "Merchant id")),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Email taken, owner role requested or bad body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    Path(merchant_id): Path<i64>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let param = CreateUserParam {
        role: parse_role(&payload.role)?,
        name: payload.name,
        email: payload.email,
        position: payload.position,
        password: payload.password,
        merchant_id: MerchantId::new(merchant_id),
    };

    let user = state.user_usecase.create_user(param).await?;
    info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_usecase.get_user(UserId::new(id)).await?;
    Ok(Json(user.into()))
}

/// Update a user's profile
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Email taken or role not assignable", body = ErrorResponse),
        (status = 403, description = "Owner role would be removed or granted", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let param = UpdateUserParam {
        role: parse_role(&payload.role)?,
        name: payload.name,
        email: payload.email,
        position: payload.position,
    };

    let user = state.user_usecase.update_user(UserId::new(id), param).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    put,
    path = "/users/{id}/password",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdatePasswordRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .user_usecase
        .update_user_password(
            UserId::new(id),
            UpdateUserPasswordParam {
                password: payload.password,
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Upload a profile photo
#[utoipa::path(
    put,
    path = "/users/{id}/photo",
    params(("id" = i64, Path, description = "User id")),
    request_body(content = PhotoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "User with the new photo URL", body = UserResponse),
        (status = 400, description = "Missing, unsupported or oversized photo", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<UserResponse>, ApiError> {
    let photo = read_photo(multipart).await?;
    let user = state
        .user_usecase
        .update_user_photo(UserId::new(id), photo)
        .await?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.user_usecase.delete_user(UserId::new(id)).await?;
    info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
