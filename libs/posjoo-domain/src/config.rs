//! Usecase configuration
//!
//! Two policies in the update flows have historically behaved differently
//! across entities. Both are explicit here and apply to users and products
//! alike.

use tracing::warn;

use crate::error::RepositoryError;

/// How the owner-protection checks of `update_user` combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleGuard {
    /// Reject demoting the owner, and reject promoting anyone to owner
    #[default]
    AnyViolation,
    /// Reject only when both happen at once. The two conditions exclude each
    /// other, so this never rejects; kept to reproduce the legacy behaviour.
    BothViolations,
}

impl RoleGuard {
    /// Decide whether a role change is forbidden
    pub fn rejects(self, tried_to_change_role: bool, tried_to_make_owner: bool) -> bool {
        match self {
            Self::AnyViolation => tried_to_change_role || tried_to_make_owner,
            Self::BothViolations => tried_to_change_role && tried_to_make_owner,
        }
    }
}

/// What an update returns when the row vanished between fetch and write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleUpdatePolicy {
    /// Surface the repository's NotFound to the caller
    #[default]
    PropagateNotFound,
    /// Return the entity as it was fetched before the write
    ReturnSnapshot,
}

impl StaleUpdatePolicy {
    /// Resolve a failed write against the entity fetched before it
    ///
    /// Only a `NotFound` under `ReturnSnapshot` turns into a success.
    pub(crate) fn absorb<T>(self, err: RepositoryError, snapshot: T) -> Result<T, RepositoryError> {
        match (self, &err) {
            (Self::ReturnSnapshot, RepositoryError::NotFound { entity }) => {
                warn!(entity = %entity, "Row vanished before the write, returning last known state");
                Ok(snapshot)
            }
            _ => Err(err),
        }
    }
}

/// Configuration shared by the user and product usecases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsecaseConfig {
    pub role_guard: RoleGuard,
    pub stale_update_policy: StaleUpdatePolicy,
}
