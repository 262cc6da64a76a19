//! Port trait for user persistence

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::{
    error::RepositoryError,
    ids::{MerchantId, UserId},
    password::PasswordHash,
    user::{NewUser, User, UserUpdate},
};

/// Port for user persistence
///
/// Every "not found" condition, including an update or delete that affected
/// zero rows, must be reported as `RepositoryError::NotFound`: the usecases
/// branch on it. Implementations should enforce email uniqueness with a
/// storage constraint and report it as `RepositoryError::UniqueViolation`.
pub trait UserRepository: Send + Sync {
    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    /// List the users of a merchant; empty when it has none
    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<User>, RepositoryError>> + Send;

    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, RepositoryError>> + Send;

    fn update_by_id(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_password_by_id(
        &self,
        id: UserId,
        password: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn update_photo_by_id(
        &self,
        id: UserId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    fn delete_by_id(&self, id: UserId) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
