//! Storage error kinds and the backend error translation

/// SQLSTATE for unique_violation
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Unique constraint on `users.email`, named by the schema migration
pub const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Errors returned by every [`UserStore`](super::UserStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid ID")]
    InvalidId,

    #[error("invalid page")]
    InvalidPage,

    #[error("invalid page size")]
    InvalidPageSize,

    #[error("user not found")]
    NotFound,

    #[error("email already exists")]
    DuplicateEmail,

    /// Anything the backend reported that isn't one of the kinds above.
    /// The cause stays attached for diagnostics but is not part of the message.
    #[error("internal database error")]
    Internal {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// Errors caused by the caller's input, detected before any I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId | Self::InvalidPage | Self::InvalidPageSize
        )
    }
}

/// Translate a sqlx error into a [`StoreError`].
///
/// 1. unique violation on the email constraint → `DuplicateEmail`
/// 2. no matching row → `NotFound`
/// 3. everything else → `Internal`, wrapping the original error
pub fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        let unique = db.code().as_deref() == Some(PG_UNIQUE_VIOLATION);
        if unique && db.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT) {
            return StoreError::DuplicateEmail;
        }
    }

    if matches!(err, sqlx::Error::RowNotFound) {
        return StoreError::NotFound;
    }

    StoreError::Internal {
        operation,
        source: err,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as _;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    /// Stand-in for a Postgres error response
    #[derive(Debug)]
    struct FakeDbError {
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "fake database error {}", self.code)
        }
    }

    impl std::error::Error for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "fake database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            if self.code == PG_UNIQUE_VIOLATION {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::Other
            }
        }
    }

    fn db_error(code: &'static str, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { code, constraint }))
    }

    #[test]
    fn email_unique_violation_is_duplicate() {
        let err = map_sqlx_error("create user", db_error("23505", Some("users_email_key")));
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[test]
    fn other_unique_violation_is_internal() {
        let err = map_sqlx_error("create user", db_error("23505", Some("users_pkey")));
        assert!(matches!(err, StoreError::Internal { operation: "create user", .. }));
    }

    #[test]
    fn row_not_found_is_not_found() {
        let err = map_sqlx_error("get user", sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn internal_keeps_cause_out_of_message() {
        let err = map_sqlx_error("list users", db_error("57014", None));
        assert_eq!(err.to_string(), "internal database error");
        let source = err.source().expect("cause attached");
        assert!(source.to_string().contains("57014"));
    }

    #[test]
    fn pool_timeout_is_internal() {
        let err = map_sqlx_error("delete user", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, StoreError::Internal { .. }));
        assert!(!err.is_input_error());
    }
}
