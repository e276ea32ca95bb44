use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Local store unavailable: {0}")]
    Unavailable(String),

    #[error("SQLite error during {op}: {source}")]
    Sqlite {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Local store connection lock poisoned")]
    Poisoned,

    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StoreError {
    /// True when SQLite rejected a write because of a constraint, e.g. a
    /// duplicate primary key.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            StoreError::Sqlite { source, .. } => matches!(
                source.sqlite_error_code(),
                Some(rusqlite::ErrorCode::ConstraintViolation)
            ),
            _ => false,
        }
    }
}
