use std::ops::Deref;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use errors::CustomError;
use thiserror::Error;

#[derive(Error, Debug)]
#[error(transparent)]
pub struct DbError(#[from] pub DieselError);

impl Deref for DbError {
    type Target = DieselError;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DbError> for CustomError {
    fn from(value: DbError) -> Self {
        diesel_db_response_error(&*value)
    }
}

fn diesel_db_response_error(err: &DieselError) -> CustomError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            match info.constraint_name() {
                Some("unique_user_game") => {
                    CustomError::Conflict("Game is already tracked in this library".to_string())
                }
                Some("games_pkey") => {
                    CustomError::Conflict("Game with this ID already exists".to_string())
                }
                Some("games_slug_key") => {
                    CustomError::Conflict("A game with this slug already exists".to_string())
                }
                _ => CustomError::DatabaseError(errors::DbError::InsertionError(format!(
                    "Database error occurred due to unique constraint violation: {}",
                    err
                ))),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            CustomError::DatabaseError(errors::DbError::InsertionError(err.to_string()))
        }
        DieselError::NotFound => CustomError::NotFound("Record not found".to_string()),
        _ => CustomError::DatabaseError(errors::DbError::QueryBuilderError(format!(
            "Unexpected database error occurred: {}",
            err
        ))),
    }
}
