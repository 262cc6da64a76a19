//! DTOs for user endpoints

use chrono::{DateTime, Utc};
use posjoo_domain::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a user
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@example.com")]
    pub email: String,
    /// `manager` or `staff`
    #[schema(example = "staff")]
    pub role: String,
    #[schema(example = "Cashier")]
    pub position: String,
    pub password: String,
}

/// Request body for updating a user's profile
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    #[schema(example = "manager")]
    pub role: String,
    pub position: String,
}

/// Request body for replacing a user's password
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// A user as returned by the API; the password hash is never exposed
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
    #[schema(example = "staff")]
    pub role: String,
    pub position: String,
    pub merchant_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email,
            photo_url: user.photo_url,
            role: user.role.to_string(),
            position: user.position,
            merchant_id: user.merchant_id.get(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
