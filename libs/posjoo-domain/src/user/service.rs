//! User usecase - Business logic orchestration
//!
//! Every operation is a single linear pass over the ports
//! (fetch → validate → mutate → re-fetch) that aborts on the first error.
//! Nothing is retried and nothing is rolled back.
//!
//! The email lookup before a write is a best-effort pre-check: two requests
//! may both pass it. The repository's unique constraint is what actually
//! guarantees uniqueness, and its violation is reported as invalid data.

use tracing::{debug, instrument};

use crate::{
    clock::{Clock, SystemClock},
    config::UsecaseConfig,
    error::{PosError, RepositoryError, Result},
    ids::{MerchantId, UserId},
    password::PasswordHash,
    storage::{photo_filename, validate_photo, PhotoStorage, PhotoUpload, USER_PHOTO_DIRECTORY},
    user::{
        CreateUserParam, NewUser, UpdateUserParam, UpdateUserPasswordParam, User, UserRepository,
        UserRole, UserUpdate,
    },
};

/// Usecase for managing the staff accounts of a merchant
///
/// This usecase encapsulates the business rules for users:
/// - Emails are unique across the whole system
/// - Only managers and staff can be created or assigned through updates
/// - The owner cannot be demoted and nobody can be promoted to owner
/// - Photos must be `.jpg`, `.jpeg` or `.png` and at most 4MB
pub struct UserUsecase<R, S, C = SystemClock> {
    repository: R,
    storage: S,
    clock: C,
    config: UsecaseConfig,
}

impl<R, S> UserUsecase<R, S>
where
    R: UserRepository,
    S: PhotoStorage,
{
    /// Create a new UserUsecase stamping times with the system clock
    pub fn new(repository: R, storage: S, config: UsecaseConfig) -> Self {
        Self::with_clock(repository, storage, config, SystemClock)
    }

    /// Create a new UserUsecase with default configuration
    pub fn with_defaults(repository: R, storage: S) -> Self {
        Self::new(repository, storage, UsecaseConfig::default())
    }
}

impl<R, S, C> UserUsecase<R, S, C>
where
    R: UserRepository,
    S: PhotoStorage,
    C: Clock,
{
    /// Create a new UserUsecase with an explicit time source
    pub fn with_clock(repository: R, storage: S, config: UsecaseConfig, clock: C) -> Self {
        Self {
            repository,
            storage,
            clock,
            config,
        }
    }

    /// Get the usecase configuration
    pub fn config(&self) -> &UsecaseConfig {
        &self.config
    }

    /// List the users of a merchant
    ///
    /// Returns an empty list when the merchant has none.
    #[instrument(skip(self), err(level = "warn"))]
    pub async fn get_merchant_users(&self, merchant_id: MerchantId) -> Result<Vec<User>> {
        let users = self.repository.get_by_merchant_id(merchant_id).await?;
        debug!(count = users.len(), "Listed merchant users");
        Ok(users)
    }

    /// Get a single user
    ///
    /// # Errors
    ///
    /// `PosError::NotFound` if no user has this id
    #[instrument(skip(self), err(level = "warn"))]
    pub async fn get_user(&self, user_id: UserId) -> Result<User> {
        Ok(self.repository.get_by_id(user_id).await?)
    }

    /// Register a manager or staff account
    ///
    /// # Errors
    ///
    /// - `PosError::InvalidData` if the email is already registered
    /// - `PosError::InvalidData` if the requested role is `Owner`
    #[instrument(
        skip(self, param),
        fields(email = %param.email, role = %param.role, merchant_id = %param.merchant_id),
        err(level = "warn")
    )]
    pub async fn create_user(&self, param: CreateUserParam) -> Result<User> {
        // Business rule: email is unique across the whole system
        let existing = self.find_by_email(&param.email).await?;
        if existing.is_some_and(|user| user.email == param.email) {
            return Err(email_taken());
        }

        // Business rule: the owner is never created through this path
        if !param.role.is_assignable() {
            return Err(PosError::invalid_data(
                "Cannot create user with requested role",
                format!("role '{}' cannot be assigned on create", param.role),
            ));
        }

        let new_user = NewUser::from_param(param, self.clock.now());
        let user = self
            .repository
            .create(new_user)
            .await
            .map_err(classify_email_conflict)?;

        debug!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Update a user's profile and return the stored result
    ///
    /// Keeping the user's own email is always allowed.
    ///
    /// # Errors
    ///
    /// - `PosError::NotFound` if no user has this id
    /// - `PosError::InvalidData` if another user owns the email
    /// - `PosError::Forbidden` if the owner role would be removed or granted
    /// - `PosError::InvalidData` if the requested role is not manager or staff
    #[instrument(
        skip(self, param),
        fields(email = %param.email, role = %param.role),
        err(level = "warn")
    )]
    pub async fn update_user(&self, user_id: UserId, param: UpdateUserParam) -> Result<User> {
        let user = self.repository.get_by_id(user_id).await?;

        // Business rule: email is unique across the whole system
        let existing = self.find_by_email(&param.email).await?;
        if existing.is_some_and(|other| other.id != user.id && other.email == param.email) {
            return Err(email_taken());
        }

        // Business rule: the owner keeps the role and nobody else gets it
        let tried_to_change_role = user.role == UserRole::Owner && param.role != UserRole::Owner;
        let tried_to_make_owner = user.role != UserRole::Owner && param.role == UserRole::Owner;
        if self
            .config
            .role_guard
            .rejects(tried_to_change_role, tried_to_make_owner)
        {
            return Err(PosError::forbidden(
                "Cannot change owner or create new owner",
                format!("role change from '{}' to '{}'", user.role, param.role),
            ));
        }

        if !param.role.is_assignable() {
            return Err(PosError::invalid_data(
                "Cannot update user with requested role",
                format!("role '{}' cannot be assigned on update", param.role),
            ));
        }

        let update = UserUpdate::from_param(param, self.clock.now());
        if let Err(err) = self.repository.update_by_id(user_id, update).await {
            return self
                .config
                .stale_update_policy
                .absorb(err, user)
                .map_err(classify_email_conflict);
        }

        Ok(self.repository.get_by_id(user_id).await?)
    }

    /// Replace a user's password
    ///
    /// No uniqueness or role checks apply.
    #[instrument(skip(self, param), err(level = "warn"))]
    pub async fn update_user_password(
        &self,
        user_id: UserId,
        param: UpdateUserPasswordParam,
    ) -> Result<()> {
        let password = PasswordHash::from_plain(&param.password);
        self.repository
            .update_password_by_id(user_id, password, self.clock.now())
            .await?;

        debug!("User password updated");
        Ok(())
    }

    /// Store a new profile photo and return the updated user
    ///
    /// The photo is saved as `image/user/user-<id><ext>`, replacing any
    /// previous upload with the same extension.
    ///
    /// # Errors
    ///
    /// - `PosError::NotFound` if no user has this id
    /// - `PosError::InvalidData` if the photo is missing, has an unsupported
    ///   extension or exceeds 4MB
    /// - `PosError::Infrastructure` if the storage backend fails
    #[instrument(
        skip(self, photo),
        fields(filename = photo.as_ref().map(PhotoUpload::filename)),
        err(level = "warn")
    )]
    pub async fn update_user_photo(
        &self,
        user_id: UserId,
        photo: Option<PhotoUpload>,
    ) -> Result<User> {
        let user = self.repository.get_by_id(user_id).await?;

        let (photo, _) = validate_photo(photo.as_ref())?;
        let filename = photo_filename("user", user.id, photo);
        let url = self
            .storage
            .save(photo, USER_PHOTO_DIRECTORY, &filename)
            .await?;

        if let Err(err) = self
            .repository
            .update_photo_by_id(user_id, &url, self.clock.now())
            .await
        {
            return Ok(self.config.stale_update_policy.absorb(err, user)?);
        }

        debug!(url = %url, "User photo updated");
        Ok(self.repository.get_by_id(user_id).await?)
    }

    /// Delete a user
    ///
    /// # Errors
    ///
    /// `PosError::NotFound` if no user has this id
    #[instrument(skip(self), err(level = "warn"))]
    pub async fn delete_user(&self, user_id: UserId) -> Result<()> {
        self.repository.delete_by_id(user_id).await?;
        debug!("User deleted");
        Ok(())
    }

    /// Look up a user by email, treating "not found" as `None`
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        match self.repository.get_by_email(email).await {
            Ok(user) => Ok(Some(user)),
            Err(RepositoryError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

fn email_taken() -> PosError {
    PosError::invalid_data("Email is already registered", "email is already registered")
}

fn classify_email_conflict(err: RepositoryError) -> PosError {
    match err {
        RepositoryError::UniqueViolation { .. } => email_taken(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;
    use crate::config::{RoleGuard, StaleUpdatePolicy};
    use crate::error::{ErrorKind, StorageError};
    use crate::memory::{InMemoryPhotoStorage, InMemoryUserRepository};
    use crate::storage::MAX_PHOTO_SIZE;
    use chrono::{DateTime, TimeZone, Utc};
    use std::future::{ready, Future};

    const MERCHANT: MerchantId = MerchantId::new(1);

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn owner(id: i64, email: &str) -> User {
        User {
            id: UserId::new(id),
            name: "Owner".to_string(),
            email: email.to_string(),
            photo_url: None,
            role: UserRole::Owner,
            position: "Founder".to_string(),
            password: PasswordHash::from_plain("owner-secret"),
            merchant_id: MERCHANT,
            created_at: fixed_time(),
            updated_at: fixed_time(),
        }
    }

    fn create_param(email: &str, role: UserRole) -> CreateUserParam {
        CreateUserParam {
            name: "Budi".to_string(),
            email: email.to_string(),
            role,
            position: "Cashier".to_string(),
            password: "p".to_string(),
            merchant_id: MERCHANT,
        }
    }

    fn update_param(email: &str, role: UserRole) -> UpdateUserParam {
        UpdateUserParam {
            name: "Budi Santoso".to_string(),
            email: email.to_string(),
            role,
            position: "Supervisor".to_string(),
        }
    }

    fn usecase(
        repository: InMemoryUserRepository,
    ) -> UserUsecase<InMemoryUserRepository, InMemoryPhotoStorage> {
        UserUsecase::with_defaults(repository, InMemoryPhotoStorage::new("http://cdn.test"))
    }

    #[tokio::test]
    async fn test_get_merchant_users_empty() {
        let usecase = usecase(InMemoryUserRepository::new());

        let users = usecase.get_merchant_users(MERCHANT).await.unwrap();

        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_get_merchant_users_filters_by_merchant() {
        let usecase = usecase(InMemoryUserRepository::new());
        usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();
        let mut other = create_param("b@x.com", UserRole::Staff);
        other.merchant_id = MerchantId::new(2);
        usecase.create_user(other).await.unwrap();

        let users = usecase.get_merchant_users(MERCHANT).await.unwrap();

        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@x.com");
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let usecase = usecase(InMemoryUserRepository::new());

        let err = usecase.get_user(UserId::new(99)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let usecase = usecase(InMemoryUserRepository::new());

        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::Staff);
        assert_ne!(user.password.as_str(), "p");
        assert!(user.password.verify("p"));
    }

    #[tokio::test]
    async fn test_create_user_stamps_created_at_from_clock() {
        let mut clock = MockClock::new();
        clock.expect_now().times(1).returning(fixed_time);
        let usecase = UserUsecase::with_clock(
            InMemoryUserRepository::new(),
            InMemoryPhotoStorage::new("http://cdn.test"),
            UsecaseConfig::default(),
            clock,
        );

        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Manager))
            .await
            .unwrap();

        assert_eq!(user.created_at, fixed_time());
        assert_eq!(user.updated_at, fixed_time());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let usecase = usecase(InMemoryUserRepository::new());
        usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let err = usecase
            .create_user(create_param("a@x.com", UserRole::Manager))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "Email is already registered");
    }

    #[tokio::test]
    async fn test_create_user_rejects_owner_role() {
        let repository = InMemoryUserRepository::new();
        let usecase = usecase(repository.clone());

        let err = usecase
            .create_user(create_param("boss@x.com", UserRole::Owner))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_email() {
        let usecase = usecase(InMemoryUserRepository::new());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let updated = usecase
            .update_user(user.id, update_param("a@x.com", UserRole::Manager))
            .await
            .unwrap();

        assert_eq!(updated.name, "Budi Santoso");
        assert_eq!(updated.role, UserRole::Manager);
        assert_eq!(updated.position, "Supervisor");
    }

    #[tokio::test]
    async fn test_update_user_email_taken_by_other() {
        let usecase = usecase(InMemoryUserRepository::new());
        usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();
        let second = usecase
            .create_user(create_param("b@x.com", UserRole::Staff))
            .await
            .unwrap();

        let err = usecase
            .update_user(second.id, update_param("a@x.com", UserRole::Staff))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "Email is already registered");
    }

    #[tokio::test]
    async fn test_update_user_not_found() {
        let usecase = usecase(InMemoryUserRepository::new());

        let err = usecase
            .update_user(UserId::new(5), update_param("a@x.com", UserRole::Staff))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_forbids_owner_demotion() {
        let repository = InMemoryUserRepository::new();
        repository.seed(owner(1, "boss@x.com"));
        let usecase = usecase(repository.clone());

        let err = usecase
            .update_user(UserId::new(1), update_param("boss@x.com", UserRole::Manager))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let stored = usecase.get_user(UserId::new(1)).await.unwrap();
        assert_eq!(stored.role, UserRole::Owner);
    }

    #[tokio::test]
    async fn test_update_user_forbids_promotion_to_owner() {
        let usecase = usecase(InMemoryUserRepository::new());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let err = usecase
            .update_user(user.id, update_param("a@x.com", UserRole::Owner))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.message(), "Cannot change owner or create new owner");
    }

    #[tokio::test]
    async fn test_legacy_role_guard_lets_owner_demotion_through() {
        let repository = InMemoryUserRepository::new();
        repository.seed(owner(1, "boss@x.com"));
        let config = UsecaseConfig {
            role_guard: RoleGuard::BothViolations,
            ..UsecaseConfig::default()
        };
        let usecase = UserUsecase::new(
            repository,
            InMemoryPhotoStorage::new("http://cdn.test"),
            config,
        );

        let updated = usecase
            .update_user(UserId::new(1), update_param("boss@x.com", UserRole::Manager))
            .await
            .unwrap();

        assert_eq!(updated.role, UserRole::Manager);
    }

    #[tokio::test]
    async fn test_legacy_role_guard_still_rejects_owner_assignment() {
        let config = UsecaseConfig {
            role_guard: RoleGuard::BothViolations,
            ..UsecaseConfig::default()
        };
        let usecase = UserUsecase::new(
            InMemoryUserRepository::new(),
            InMemoryPhotoStorage::new("http://cdn.test"),
            config,
        );
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let err = usecase
            .update_user(user.id, update_param("a@x.com", UserRole::Owner))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_owner_keeping_role_fails_role_validation() {
        let repository = InMemoryUserRepository::new();
        repository.seed(owner(1, "boss@x.com"));
        let usecase = usecase(repository);

        let err = usecase
            .update_user(UserId::new(1), update_param("boss@x.com", UserRole::Owner))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn test_update_user_password() {
        let repository = InMemoryUserRepository::new();
        let usecase = usecase(repository);
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        usecase
            .update_user_password(
                user.id,
                UpdateUserPasswordParam {
                    password: "new-secret".to_string(),
                },
            )
            .await
            .unwrap();

        let stored = usecase.get_user(user.id).await.unwrap();
        assert!(stored.password.verify("new-secret"));
        assert!(!stored.password.verify("p"));
    }

    #[tokio::test]
    async fn test_update_user_password_unknown_user() {
        let usecase = usecase(InMemoryUserRepository::new());

        let err = usecase
            .update_user_password(
                UserId::new(3),
                UpdateUserPasswordParam {
                    password: "x".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_photo_stores_deterministic_name() {
        let storage = InMemoryPhotoStorage::new("http://cdn.test");
        let usecase = UserUsecase::with_defaults(InMemoryUserRepository::new(), storage.clone());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let photo = PhotoUpload::new("selfie.png", vec![1u8; 16]);
        let updated = usecase
            .update_user_photo(user.id, Some(photo))
            .await
            .unwrap();

        let key = format!("image/user/user-{}.png", user.id);
        assert_eq!(
            updated.photo_url,
            Some(format!("http://cdn.test/{key}"))
        );
        assert!(storage.object(&key).is_some());
    }

    #[tokio::test]
    async fn test_update_user_photo_missing() {
        let usecase = usecase(InMemoryUserRepository::new());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let err = usecase.update_user_photo(user.id, None).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "photo cannot be empty");
    }

    #[tokio::test]
    async fn test_update_user_photo_user_checked_first() {
        let usecase = usecase(InMemoryUserRepository::new());

        let err = usecase
            .update_user_photo(UserId::new(8), None)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_photo_size_boundary() {
        let usecase = usecase(InMemoryUserRepository::new());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        let at_limit = PhotoUpload::new("a.JPEG", vec![0u8; MAX_PHOTO_SIZE as usize]);
        assert!(usecase.update_user_photo(user.id, Some(at_limit)).await.is_ok());

        let over = PhotoUpload::new("a.jpeg", vec![0u8; MAX_PHOTO_SIZE as usize + 1]);
        let err = usecase
            .update_user_photo(user.id, Some(over))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Max photo size is 4MB");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let usecase = usecase(InMemoryUserRepository::new());
        let user = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap();

        usecase.delete_user(user.id).await.unwrap();

        let err = usecase.get_user(user.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_user_not_found() {
        let usecase = usecase(InMemoryUserRepository::new());

        let err = usecase.delete_user(UserId::new(404)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    /// Repository whose writes fail after the reads succeed
    struct VanishingRepository {
        inner: InMemoryUserRepository,
        write_error: RepositoryError,
    }

    impl UserRepository for VanishingRepository {
        fn get_by_id(
            &self,
            id: UserId,
        ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
            self.inner.get_by_id(id)
        }

        fn get_by_email(
            &self,
            email: &str,
        ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
            self.inner.get_by_email(email)
        }

        fn get_by_merchant_id(
            &self,
            merchant_id: MerchantId,
        ) -> impl Future<Output = std::result::Result<Vec<User>, RepositoryError>> + Send {
            self.inner.get_by_merchant_id(merchant_id)
        }

        fn create(
            &self,
            _user: NewUser,
        ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
            ready(Err(self.write_error.clone()))
        }

        fn update_by_id(
            &self,
            _id: UserId,
            _update: UserUpdate,
        ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
            ready(Err(self.write_error.clone()))
        }

        fn update_password_by_id(
            &self,
            _id: UserId,
            _password: PasswordHash,
            _updated_at: DateTime<Utc>,
        ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
            ready(Err(self.write_error.clone()))
        }

        fn update_photo_by_id(
            &self,
            _id: UserId,
            _photo_url: &str,
            _updated_at: DateTime<Utc>,
        ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
            ready(Err(self.write_error.clone()))
        }

        fn delete_by_id(
            &self,
            _id: UserId,
        ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
            ready(Err(self.write_error.clone()))
        }
    }

    fn vanishing_usecase(
        write_error: RepositoryError,
        policy: StaleUpdatePolicy,
    ) -> UserUsecase<VanishingRepository, InMemoryPhotoStorage> {
        let inner = InMemoryUserRepository::new();
        let mut staff = owner(1, "a@x.com");
        staff.role = UserRole::Staff;
        inner.seed(staff);
        UserUsecase::new(
            VanishingRepository { inner, write_error },
            InMemoryPhotoStorage::new("http://cdn.test"),
            UsecaseConfig {
                stale_update_policy: policy,
                ..UsecaseConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_update_user_propagates_late_not_found() {
        let usecase = vanishing_usecase(
            RepositoryError::not_found("User"),
            StaleUpdatePolicy::PropagateNotFound,
        );

        let err = usecase
            .update_user(UserId::new(1), update_param("a@x.com", UserRole::Manager))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_snapshot_on_late_not_found() {
        let usecase = vanishing_usecase(
            RepositoryError::not_found("User"),
            StaleUpdatePolicy::ReturnSnapshot,
        );

        let user = usecase
            .update_user(UserId::new(1), update_param("a@x.com", UserRole::Manager))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Staff);
        assert_eq!(user.name, "Owner");
    }

    #[tokio::test]
    async fn test_update_user_photo_propagates_late_not_found() {
        let usecase = vanishing_usecase(
            RepositoryError::not_found("User"),
            StaleUpdatePolicy::PropagateNotFound,
        );

        let err = usecase
            .update_user_photo(UserId::new(1), Some(PhotoUpload::new("a.png", vec![1u8])))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_user_photo_snapshot_on_late_not_found() {
        let usecase = vanishing_usecase(
            RepositoryError::not_found("User"),
            StaleUpdatePolicy::ReturnSnapshot,
        );

        let user = usecase
            .update_user_photo(UserId::new(1), Some(PhotoUpload::new("a.png", vec![1u8])))
            .await
            .unwrap();

        assert_eq!(user.photo_url, None);
        assert_eq!(user.name, "Owner");
        assert_eq!(user.role, UserRole::Staff);
    }

    #[tokio::test]
    async fn test_unique_violation_at_write_is_invalid_data() {
        let usecase = vanishing_usecase(
            RepositoryError::unique_violation("Email"),
            StaleUpdatePolicy::PropagateNotFound,
        );

        let create_err = usecase
            .create_user(create_param("racer@x.com", UserRole::Staff))
            .await
            .unwrap_err();
        let update_err = usecase
            .update_user(UserId::new(1), update_param("racer@x.com", UserRole::Staff))
            .await
            .unwrap_err();

        for err in [create_err, update_err] {
            assert_eq!(err.kind(), ErrorKind::InvalidData);
            assert_eq!(err.message(), "Email is already registered");
        }
    }

    #[tokio::test]
    async fn test_backend_failure_on_lookup_aborts_create() {
        struct BrokenLookup(InMemoryUserRepository);

        impl UserRepository for BrokenLookup {
            fn get_by_id(
                &self,
                id: UserId,
            ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
                self.0.get_by_id(id)
            }

            fn get_by_email(
                &self,
                _email: &str,
            ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
                ready(Err(RepositoryError::backend("connection refused")))
            }

            fn get_by_merchant_id(
                &self,
                merchant_id: MerchantId,
            ) -> impl Future<Output = std::result::Result<Vec<User>, RepositoryError>> + Send
            {
                self.0.get_by_merchant_id(merchant_id)
            }

            fn create(
                &self,
                user: NewUser,
            ) -> impl Future<Output = std::result::Result<User, RepositoryError>> + Send {
                self.0.create(user)
            }

            fn update_by_id(
                &self,
                id: UserId,
                update: UserUpdate,
            ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
                self.0.update_by_id(id, update)
            }

            fn update_password_by_id(
                &self,
                id: UserId,
                password: PasswordHash,
                updated_at: DateTime<Utc>,
            ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
                self.0.update_password_by_id(id, password, updated_at)
            }

            fn update_photo_by_id(
                &self,
                id: UserId,
                photo_url: &str,
                updated_at: DateTime<Utc>,
            ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
                self.0.update_photo_by_id(id, photo_url, updated_at)
            }

            fn delete_by_id(
                &self,
                id: UserId,
            ) -> impl Future<Output = std::result::Result<(), RepositoryError>> + Send {
                self.0.delete_by_id(id)
            }
        }

        let repository = InMemoryUserRepository::new();
        let usecase = UserUsecase::with_defaults(
            BrokenLookup(repository.clone()),
            InMemoryPhotoStorage::new("http://cdn.test"),
        );

        let err = usecase
            .create_user(create_param("a@x.com", UserRole::Staff))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        assert!(repository.is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_is_infrastructure() {
        struct FailingStorage;

        impl PhotoStorage for FailingStorage {
            fn save(
                &self,
                _photo: &PhotoUpload,
                _directory: &str,
                _filename: &str,
            ) -> impl Future<Output = std::result::Result<String, StorageError>> + Send {
                ready(Err(StorageError::failure("bucket missing")))
            }
        }

        let repository = InMemoryUserRepository::new();
        let mut staff = owner(1, "a@x.com");
        staff.role = UserRole::Staff;
        repository.seed(staff);
        let usecase = UserUsecase::with_defaults(repository, FailingStorage);

        let err = usecase
            .update_user_photo(UserId::new(1), Some(PhotoUpload::new("a.png", vec![1u8])))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Infrastructure);
        let stored = usecase.get_user(UserId::new(1)).await.unwrap();
        assert_eq!(stored.photo_url, None);
    }
}
