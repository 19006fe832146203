//! Error types module
//!
//! All failures in the booking core are represented by the [`AppError`] enum.
//! Every variant is recoverable from the caller's point of view; none is fatal
//! to the process. `Conflict` is the one the caller must treat specially: the
//! correct reaction is to re-query availability, not to retry the same request.

use sqlx::Error as SqlxError;

/// Log level a transport should use when reporting an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected outcomes: validation failures, state-machine rejections.
    Debug,
    /// Recoverable contention, e.g. a lost booking race.
    Warn,
    /// Unexpected failures.
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Inactive resource: {0}")]
    InactiveResource(String),

    #[error("Not entitled: {0}")]
    NotEntitled(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// A unique-constraint violation on insert is the storage layer rejecting the
/// second writer of a slot; everything else stays a database error.
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::Database(ref db) = err {
            if db.is_unique_violation() {
                return AppError::Conflict("time slot is already reserved".to_string());
            }
        }
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Static metadata per variant: (error_code, recoverable, suggested_action, log_level).
fn static_metadata(err: &AppError) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::Database(_) => (
            "DATABASE_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists and belongs to the organization"),
            LogLevel::Debug,
        ),
        AppError::InactiveResource(_) => (
            "INACTIVE_RESOURCE",
            false,
            Some("Pick an active service"),
            LogLevel::Debug,
        ),
        AppError::NotEntitled(_) => (
            "NOT_ENTITLED",
            false,
            Some("Activate or renew the organization's subscription"),
            LogLevel::Debug,
        ),
        AppError::InvalidTransition(_) => (
            "INVALID_TRANSITION",
            false,
            Some("Re-fetch the booking and check its current status"),
            LogLevel::Debug,
        ),
        AppError::Conflict(_) => (
            "CONFLICT",
            true,
            Some("Re-query availability and pick a different slot"),
            LogLevel::Warn,
        ),
        AppError::Unauthorized(_) => ("UNAUTHORIZED", false, None, LogLevel::Debug),
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Check request parameters and try again"),
            LogLevel::Debug,
        ),
        AppError::Internal(_) => (
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Machine-readable error code (e.g. "CONFLICT").
    pub fn error_code(&self) -> &'static str {
        static_metadata(self).0
    }

    /// Whether retrying (possibly after re-querying state) can succeed.
    pub fn is_recoverable(&self) -> bool {
        static_metadata(self).1
    }

    /// Suggested reaction for the caller.
    pub fn suggested_action(&self) -> Option<&'static str> {
        static_metadata(self).2
    }

    pub fn log_level(&self) -> LogLevel {
        static_metadata(self).3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_metadata() {
        let err = AppError::Conflict("time slot is already reserved".to_string());
        assert_eq!(err.error_code(), "CONFLICT");
        assert!(err.is_recoverable());
        assert_eq!(
            err.suggested_action(),
            Some("Re-query availability and pick a different slot")
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_not_entitled_metadata() {
        let err = AppError::NotEntitled("subscription expired".to_string());
        assert_eq!(err.error_code(), "NOT_ENTITLED");
        assert!(!err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_sqlx_error_maps_to_database() {
        let err = AppError::from(SqlxError::PoolClosed);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert!(err.is_recoverable());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_invalid_transition_metadata() {
        let err = AppError::InvalidTransition("booking is CANCELED".to_string());
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.suggested_action(),
            Some("Re-fetch the booking and check its current status")
        );
    }
}
