//! Shared Diesel error classification for the repositories in this module.
//!
//! Each repository turns a [`DieselFailure`] into its own port error so the
//! logging and variant matching live in one place.

use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a failed Diesel operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique or primary-key constraint rejected the write.
    UniqueViolation,
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// Any other query or database failure.
    Query(&'static str),
}

/// Extract the message carried by a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Log a Diesel error at debug level and classify it.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DeserializationError(_) => DieselFailure::Query("row decoding error"),
        _ => DieselFailure::Query("database error"),
    }
}
