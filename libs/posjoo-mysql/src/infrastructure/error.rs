//! Translation of sqlx errors into repository errors

use posjoo_domain::RepositoryError;
use sqlx::error::ErrorKind;
use tracing::error;

/// Map a sqlx error raised while touching `entity`
///
/// A unique-constraint rejection is reported against `unique_field`, the only
/// unique column set of each table.
pub(crate) fn map_sqlx_error(
    err: sqlx::Error,
    entity: &'static str,
    unique_field: &'static str,
) -> RepositoryError {
    match err {
        sqlx::Error::RowNotFound => RepositoryError::not_found(entity),
        sqlx::Error::Database(db_err) if db_err.kind() == ErrorKind::UniqueViolation => {
            RepositoryError::unique_violation(unique_field)
        }
        other => {
            error!(entity, error = %other, "MySQL query failed");
            RepositoryError::backend(other.to_string())
        }
    }
}

/// Interpret the affected row count of an `UPDATE` or `DELETE`
pub(crate) fn expect_affected(rows_affected: u64, entity: &'static str) -> Result<(), RepositoryError> {
    if rows_affected == 0 {
        Err(RepositoryError::not_found(entity))
    } else {
        Ok(())
    }
}
