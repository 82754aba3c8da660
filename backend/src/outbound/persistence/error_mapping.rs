//! Shared classification of pool and Diesel failures.
//!
//! Repositories turn a [`DbFailure`] into their own port error so the
//! mapping rules (what counts as an outage, what counts as a conflict) stay
//! in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a failed database call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The database could not be reached.
    Connection(String),
    /// Unique violation or serialisation failure. Carries the constraint name
    /// when Postgres reported one.
    Conflict {
        constraint: Option<String>,
        message: String,
    },
    /// Anything else.
    Query(String),
}

pub(crate) fn classify_pool_error(error: PoolError) -> DbFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DbFailure::Connection(message)
        }
    }
}

pub(crate) fn classify_diesel_error(error: DieselError) -> DbFailure {
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
        DieselError::DatabaseError(
            kind @ (DatabaseErrorKind::UniqueViolation | DatabaseErrorKind::SerializationFailure),
            info,
        ) => DbFailure::Conflict {
            constraint: info.constraint_name().map(str::to_owned),
            message: match kind {
                DatabaseErrorKind::UniqueViolation => "unique constraint violated".to_owned(),
                _ => "concurrent update conflict, try again".to_owned(),
            },
        },
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DbFailure::Conflict {
                constraint: None,
                message: "referenced record no longer exists".to_owned(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        _ => DbFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    use super::*;

    #[derive(Debug)]
    struct Info(Option<&'static str>);

    impl DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "boom"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.0
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info(constraint)))
    }

    #[rstest]
    fn unique_violation_keeps_constraint_name() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("rounds_name_interview_key"),
        ));
        let DbFailure::Conflict { constraint, .. } = failure else {
            panic!("expected a conflict");
        };
        assert_eq!(constraint.as_deref(), Some("rounds_name_interview_key"));
    }

    #[rstest]
    #[case(DatabaseErrorKind::SerializationFailure)]
    #[case(DatabaseErrorKind::ForeignKeyViolation)]
    fn contention_is_a_conflict(#[case] kind: DatabaseErrorKind) {
        let failure = classify_diesel_error(database_error(kind, None));
        assert!(matches!(failure, DbFailure::Conflict { .. }));
    }

    #[rstest]
    fn closed_connection_is_an_outage() {
        let failure =
            classify_diesel_error(database_error(DatabaseErrorKind::ClosedConnection, None));
        assert!(matches!(failure, DbFailure::Connection(_)));
    }

    #[rstest]
    fn pool_errors_are_outages() {
        let failure = classify_pool_error(PoolError::checkout("timed out"));
        assert_eq!(failure, DbFailure::Connection("timed out".to_owned()));
    }
}
