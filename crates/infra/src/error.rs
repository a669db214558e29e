//! Resolver error model.
//!
//! "No authorization" is not an error: resolver operations return `Ok(None)`
//! for it. Errors are reserved for malformed requests and store failures.

use thiserror::Error;

use orgauth_core::DomainError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No principal was supplied.
    #[error("missing identity")]
    MissingIdentity,

    /// Neither an org nor a business identifier was supplied.
    #[error("missing target")]
    MissingTarget,

    /// A supplied value is malformed (blank corp type, bad org id, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backing store failed.
    #[error("store error: {0}")]
    Store(String),
}

impl From<DomainError> for ResolveError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Unauthorized => ResolveError::MissingIdentity,
            other => ResolveError::InvalidInput(other.to_string()),
        }
    }
}

/// Map a sqlx error into a `ResolveError`, tagging the failing operation.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> ResolveError {
    match err {
        sqlx::Error::Database(db_err) => {
            ResolveError::Store(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            ResolveError::Store(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            ResolveError::Store(format!("timed out acquiring a connection in {}", operation))
        }
        sqlx::Error::ColumnDecode { index, source } => ResolveError::Store(format!(
            "failed to decode column {} in {}: {}",
            index, operation, source
        )),
        _ => ResolveError::Store(format!("sqlx error in {}: {}", operation, err)),
    }
}

/// Reject blank strings; returns the trimmed value.
pub(crate) fn non_blank<'a>(value: &'a str, what: &str) -> Result<&'a str, ResolveError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ResolveError::InvalidInput(format!("{what} must not be blank")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_resolver_taxonomy() {
        assert_eq!(ResolveError::from(DomainError::Unauthorized), ResolveError::MissingIdentity);
        assert!(matches!(
            ResolveError::from(DomainError::invalid_id("OrgId: bad")),
            ResolveError::InvalidInput(_)
        ));
    }

    #[test]
    fn non_blank_trims_and_rejects_empty() {
        assert_eq!(non_blank("  BC ", "corp type").unwrap(), "BC");
        assert!(matches!(non_blank("   ", "corp type"), Err(ResolveError::InvalidInput(_))));
    }
}
