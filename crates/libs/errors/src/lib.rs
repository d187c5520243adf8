use std::{error::Error, fmt::Debug};

use thiserror::Error;

/// Failure taxonomy shared by every library operation.
///
/// `ValidationError` is an invalid argument and is never retried, `NotFound`
/// means neither the store nor the catalog knows the game, `DatabaseError` is
/// a failed primary read or write. Best-effort writes never produce one of
/// these; they are logged where they happen.
#[derive(Error)]
pub enum CustomError {
    #[error("Validation Error: {0}")]
    ValidationError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database Error: {0}")]
    DatabaseError(#[from] DbError),

    #[error("Unexpected Error")]
    UnexpectedError(#[from] anyhow::Error)
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection Error: {0}")]
    ConnectionError(String),

    #[error("Query Error: {0}")]
    QueryBuilderError(String),

    #[error("Insertion Error: {0}")]
    InsertionError(String),

    #[error("Updation Error: {0}")]
    UpdationError(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Other Database Error: {0}")]
    Other(String),
}

impl CustomError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CustomError::NotFound(_) | CustomError::DatabaseError(DbError::NotFound(_))
        )
    }
}

impl Debug for CustomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain(self, f)
    }
}

fn error_chain(
    source: &impl Error,
    f: &mut std::fmt::Formatter
) -> std::fmt::Result {
    writeln!(f, "{}", source)?;

    if let Some(next) = source.source() {
        write!(f, "Caused by: \n\t{:?}", next)?;
    }

    Ok(())
}
