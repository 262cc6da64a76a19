use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::future::{ready, Future};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    error::RepositoryError,
    ids::{MerchantId, UserId},
    password::PasswordHash,
    user::{NewUser, User, UserRepository, UserUpdate},
};

const ENTITY: &str = "User";

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<UserId, User>,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }

    fn row_mut(&mut self, id: UserId) -> Result<&mut User, RepositoryError> {
        self.rows
            .get_mut(&id)
            .ok_or(RepositoryError::not_found(ENTITY))
    }
}

/// `UserRepository` backed by a map
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<Mutex<Table>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user as-is, bypassing the usecase rules
    ///
    /// This is how an owner account enters the store.
    pub fn seed(&self, user: User) {
        let mut table = self.lock();
        table.last_id = table.last_id.max(user.id.get());
        table.rows.insert(user.id, user);
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl UserRepository for InMemoryUserRepository {
    fn get_by_id(&self, id: UserId) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }

    fn get_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }

    fn get_by_merchant_id(
        &self,
        merchant_id: MerchantId,
    ) -> impl Future<Output = Result<Vec<User>, RepositoryError>> + Send {
        let users = self
            .lock()
            .rows
            .values()
            .filter(|user| user.merchant_id == merchant_id)
            .cloned()
            .collect();
        ready(Ok(users))
    }

    fn create(&self, user: NewUser) -> impl Future<Output = Result<User, RepositoryError>> + Send {
        let mut table = self.lock();
        let result = if table.email_taken(&user.email, None) {
            Err(RepositoryError::unique_violation("Email"))
        } else {
            table.last_id += 1;
            let created = User {
                id: UserId::new(table.last_id),
                name: user.name,
                email: user.email,
                photo_url: None,
                role: user.role,
                position: user.position,
                password: user.password,
                merchant_id: user.merchant_id,
                created_at: user.created_at,
                updated_at: user.created_at,
            };
            table.rows.insert(created.id, created.clone());
            Ok(created)
        };
        ready(result)
    }

    fn update_by_id(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let mut table = self.lock();
        let result = if table.email_taken(&update.email, Some(id)) {
            Err(RepositoryError::unique_violation("Email"))
        } else {
            table.row_mut(id).map(|user| {
                user.name = update.name;
                user.email = update.email;
                user.role = update.role;
                user.position = update.position;
                user.updated_at = update.updated_at;
            })
        };
        ready(result)
    }

    fn update_password_by_id(
        &self,
        id: UserId,
        password: PasswordHash,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self.lock().row_mut(id).map(|user| {
            user.password = password;
            user.updated_at = updated_at;
        });
        ready(result)
    }

    fn update_photo_by_id(
        &self,
        id: UserId,
        photo_url: &str,
        updated_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self.lock().row_mut(id).map(|user| {
            user.photo_url = Some(photo_url.to_string());
            user.updated_at = updated_at;
        });
        ready(result)
    }

    fn delete_by_id(&self, id: UserId) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        let result = self
            .lock()
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::not_found(ENTITY));
        ready(result)
    }
}
