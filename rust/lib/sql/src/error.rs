use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    /// The database is locked by another writer (e.g. the firmware publisher).
    #[error("database busy: {0}")]
    Busy(String),
}

impl SQLError {
    /// Classify a rusqlite error, keeping lock contention distinguishable.
    pub(crate) fn from_rusqlite(err: rusqlite::Error, wrap: fn(String) -> SQLError) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
                SQLError::Busy(err.to_string())
            }
            _ => wrap(err.to_string()),
        }
    }
}
