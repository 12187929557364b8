/// Service-level error taxonomy
///
/// All business workflows return `Result<T, ServiceError>`. The API crate
/// maps each variant onto an HTTP status: BadRequest → 400, Unauthorized →
/// 401, NotFound → 404, Conflict → 409, Database/Internal → 500.
///
/// Operational variants carry a human-readable message that is surfaced
/// verbatim to the client. Database and internal errors are non-operational
/// and are masked at the HTTP boundary.
use crate::auth::password::PasswordError;

/// Error type for business workflows
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed input or a business-rule violation (400)
    #[error("{0}")]
    BadRequest(String),

    /// Failed authentication (401)
    #[error("{0}")]
    Unauthorized(String),

    /// A referenced entity does not exist (404)
    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule was violated, e.g. duplicate email (409)
    #[error("{0}")]
    Conflict(String),

    /// Database failure, non-operational
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other internal failure, non-operational
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {err}"))
    }
}

impl ServiceError {
    /// Whether the error is operational (safe to surface verbatim)
    pub fn is_operational(&self) -> bool {
        !matches!(self, ServiceError::Database(_) | ServiceError::Internal(_))
    }
}

/// Maps a unique-constraint violation onto an operational Conflict
///
/// Workflows that rely on a database uniqueness rule (duplicate membership,
/// duplicate project name) call this so the violation surfaces as a 409
/// with a domain message instead of a masked internal error.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> ServiceError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            ServiceError::Conflict(message.to_string())
        }
        _ => ServiceError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operational_messages_pass_through() {
        let err = ServiceError::Conflict("Workspace already exists.".to_string());
        assert_eq!(err.to_string(), "Workspace already exists.");
        assert!(err.is_operational());
    }

    #[test]
    fn test_database_errors_are_not_operational() {
        assert!(!ServiceError::Database(sqlx::Error::RowNotFound).is_operational());
        assert!(!ServiceError::Internal("boom".to_string()).is_operational());
    }
}
