//! User entity, roles and request payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::{MerchantId, UserId};
use crate::password::PasswordHash;

/// Role of a staff account inside its merchant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Manager,
    Staff,
}

impl UserRole {
    /// Roles that may be assigned through create and update
    pub const ASSIGNABLE: [UserRole; 2] = [UserRole::Manager, UserRole::Staff];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }

    pub fn is_assignable(self) -> bool {
        Self::ASSIGNABLE.contains(&self)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// A staff account belonging to a merchant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Unique across the whole system
    pub email: String,
    pub photo_url: Option<String>,
    pub role: UserRole,
    pub position: String,
    #[serde(skip_serializing)]
    pub password: PasswordHash,
    pub merchant_id: MerchantId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload of `create_user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserParam {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub position: String,
    /// Raw password; hashed before it reaches the repository
    pub password: String,
    pub merchant_id: MerchantId,
}

/// Payload of `update_user`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserParam {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub position: String,
}

/// Payload of `update_user_password`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserPasswordParam {
    pub password: String,
}

/// Record handed to the repository to insert a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub position: String,
    pub password: PasswordHash,
    pub merchant_id: MerchantId,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Hash the password and stamp the creation time
    pub fn from_param(param: CreateUserParam, created_at: DateTime<Utc>) -> Self {
        Self {
            password: PasswordHash::from_plain(&param.password),
            name: param.name,
            email: param.email,
            role: param.role,
            position: param.position,
            merchant_id: param.merchant_id,
            created_at,
        }
    }
}

/// Record handed to the repository to update a user's profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub position: String,
    pub updated_at: DateTime<Utc>,
}

impl UserUpdate {
    pub fn from_param(param: UpdateUserParam, updated_at: DateTime<Utc>) -> Self {
        Self {
            name: param.name,
            email: param.email,
            role: param.role,
            position: param.position,
            updated_at,
        }
    }
}
