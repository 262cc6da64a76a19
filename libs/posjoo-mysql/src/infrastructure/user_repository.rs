//! MySQL User Repository Implementation

use chrono::{DateTime, Utc};
use posjoo_domain::{
    user::{NewUser, UserUpdate},
    MerchantId, PasswordHash, RepositoryError, User, UserId, UserRepository, UserRole,
};
use sqlx::{mysql::MySqlPool, query, query_as, FromRow};
use std::future::Future;
use tracing::{debug, instrument};

use super::error::{expect_affected, map_sqlx_error};

const ENTITY: &str = "User";
const UNIQUE_FIELD: &str = "Email";

const SELECT_BY_ID: &str = "SELECT id, name, email, photo_url, role, position, password, \
                            merchant_id, created_at, updated_at FROM users WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT id, name, email, photo_url, role, position, password, \
                               merchant_id, created_at, updated_at FROM users WHERE email = ?";
const SELECT_BY_MERCHANT: &str = "SELECT id, name, email, photo_url, role, position, password, \
                                  merchant_id, created_at, updated_at FROM users \
                                  WHERE merchant_id = ? ORDER BY id";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    photo_url: Option<String>,
    role: String,
    position: String,
    password: String,
    merchant_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|err| RepositoryError::backend(err.to_string()))?;

        Ok(User {
            id: UserId::new(row.id),
            name: row.name,
            email: row.email,
            photo_url: row.photo_url,
            role,
            position: row.position,
            password: PasswordHash::from_hash(row.password),
            merchant_id: MerchantId::new(row.merchant_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// `UserRepository` backed by the `users` table
///
/// Email uniqueness is enforced by the `uq_users_email` constraint.
#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// MySQL reports zero affected rows when an UPDATE changes nothing, so a
    /// zero count alone does not mean the row is gone.
    async fn ensure_exists(&self, id: UserId) -> Result<(), RepositoryError> {
        query("SELECT 1 FROM users WHERE id = ?")
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?
            .map(|_| ())
            .ok_or(RepositoryError::not_found(ENTITY))
    }
}

impl UserRepository for MySqlUserRepository {
    #[instrument(skip(self))]
    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        async move {
            query_as::<_, UserRow>(SELECT_BY_ID)
                .bind(id.get())
                .fetch_one(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?
                .try_into()
        }
    }

    #[instrument(skip(self))]
    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        async move {
            query_as::<_, UserRow>(SELECT_BY_EMAIL)
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?
                .try_into()
        }
    }

    #[instrument(skip(self))]
    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<User>, RepositoryError>> + Send {
        async move {
            let rows = query_as::<_, UserRow>(SELECT_BY_MERCHANT)
                .bind(merchant_id.get())
                .fetch_all(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            debug!(count = rows.len(), "Fetched merchant users");
            rows.into_iter().map(User::try_from).collect()
        }
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        async move {
            let result = query(
                "INSERT INTO users (name, email, role, position, password, merchant_id, \
                 created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&user.name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.position)
            .bind(user.password.as_str())
            .bind(user.merchant_id.get())
            .bind(user.created_at)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            let id = i64::try_from(result.last_insert_id())
                .map_err(|err| RepositoryError::backend(err.to_string()))?;
            debug!(user_id = id, "Inserted user");

            Ok(User {
                id: UserId::new(id),
                name: user.name,
                email: user.email,
                photo_url: None,
                role: user.role,
                position: user.position,
                password: user.password,
                merchant_id: user.merchant_id,
                created_at: user.created_at,
                updated_at: user.created_at,
            })
        }
    }

    #[instrument(skip(self, update), fields(email = %update.email))]
    fn update_by_id(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query(
                "UPDATE users SET name = ?, email = ?, role = ?, position = ?, updated_at = ? \
                 WHERE id = ?",
            )
            .bind(&update.name)
            .bind(&update.email)
            .bind(update.role.as_str())
            .bind(&update.position)
            .bind(update.updated_at)
            .bind(id.get())
            .execute(&self.pool)
            .await
            .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            if result.rows_affected() == 0 {
                return self.ensure_exists(id).await;
            }
            Ok(())
        }
    }

    #[instrument(skip(self, password))]
    fn update_password_by_id(
        &self,
        id: UserId,
        password: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query("UPDATE users SET password = ?, updated_at = ? WHERE id = ?")
                .bind(password.as_str())
                .bind(updated_at)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            if result.rows_affected() == 0 {
                return self.ensure_exists(id).await;
            }
            Ok(())
        }
    }

    #[instrument(skip(self))]
    fn update_photo_by_id(
        &self,
        id: UserId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query("UPDATE users SET photo_url = ?, updated_at = ? WHERE id = ?")
                .bind(photo_url)
                .bind(updated_at)
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            if result.rows_affected() == 0 {
                return self.ensure_exists(id).await;
            }
            Ok(())
        }
    }

    #[instrument(skip(self))]
    fn delete_by_id(&self, id: UserId) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        async move {
            let result = query("DELETE FROM users WHERE id = ?")
                .bind(id.get())
                .execute(&self.pool)
                .await
                .map_err(|err| map_sqlx_error(err, ENTITY, UNIQUE_FIELD))?;

            expect_affected(result.rows_affected(), ENTITY)
        }
    }
}
