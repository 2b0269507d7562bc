use bedwatch_core::backend::BackendError;

/// PostgreSQL unique violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Classify a sqlx error into a [`BackendError`].
///
/// Unique violations on constraints named `uq_*` become conflicts; anything
/// else is a query failure.
pub(crate) fn classify(err: sqlx::Error) -> BackendError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return BackendError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    BackendError::Query(err.to_string())
}
