//! Repository layer over the data store adapter.
//!
//! Repositories forward to an injected [`DatabaseService`] and narrow its
//! errors to [`RepositoryError`], so handlers never see driver details.
//!
//! [`DatabaseService`]: crate::db::DatabaseService

use thiserror::Error;

use crate::db::DatabaseError;

pub mod students;
pub mod users;

pub use students::{StudentsRepo, StudentsRepository};
pub use users::{UsersRepo, UsersRepository};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("student not found")]
    StudentNotFound,

    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserAlreadyExists,

    /// Any other store failure; the adapter error is kept as the source
    #[error("storage failure: {0}")]
    Storage(#[source] DatabaseError),
}

impl From<DatabaseError> for RepositoryError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::StudentNotFound => RepositoryError::StudentNotFound,
            DatabaseError::UserNotFound => RepositoryError::UserNotFound,
            DatabaseError::UserAlreadyExists => RepositoryError::UserAlreadyExists,
            other => RepositoryError::Storage(other),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
