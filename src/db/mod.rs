//! Data store adapter.
//!
//! [`DatabaseService`] is the only component that talks to the relational
//! store. Each operation reports failures through [`DatabaseError`], which keeps
//! the driver error as its source so it can be logged further up.

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use thiserror::Error;

use crate::auth::models::{NewUser, User};
use crate::config::DatabaseConfig;
use crate::models::{NewStudent, Student, StudentChanges};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgDatabaseService;

/// Errors produced by the data store adapter
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("couldn't connect to database")]
    Connection(#[source] sqlx::Error),

    #[error("student not found")]
    StudentNotFound,

    #[error("couldn't find student")]
    FindStudentFailed(#[source] sqlx::Error),

    #[error("couldn't list students")]
    ListStudentsFailed(#[source] sqlx::Error),

    #[error("couldn't create student")]
    CreateStudentFailed(#[source] sqlx::Error),

    #[error("couldn't update student")]
    UpdateStudentFailed(#[source] sqlx::Error),

    #[error("couldn't delete student")]
    DeleteStudentFailed(#[source] sqlx::Error),

    #[error("user not found")]
    UserNotFound,

    #[error("couldn't find user")]
    FindUserFailed(#[source] sqlx::Error),

    #[error("couldn't create user")]
    CreateUserFailed(#[source] sqlx::Error),

    #[error("user already exists")]
    UserAlreadyExists,
}

/// Operations the service needs from the relational store
///
/// Student identifiers are accepted in their string form, as they arrive
/// from the request path.
#[async_trait]
pub trait DatabaseService: Send + Sync {
    async fn find_student(&self, id: &str) -> Result<Student, DatabaseError>;

    async fn list_students(&self, offset: i64, limit: i64) -> Result<Vec<Student>, DatabaseError>;

    async fn create_student(&self, student: NewStudent) -> Result<Student, DatabaseError>;

    async fn update_student(
        &self,
        id: &str,
        changes: StudentChanges,
    ) -> Result<Student, DatabaseError>;

    async fn delete_student(&self, id: &str) -> Result<(), DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<User, DatabaseError>;

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError>;
}

/// Parse a student identifier from its string form
///
/// Returns `None` when the value cannot name any row.
pub fn parse_student_id(id: &str) -> Option<i32> {
    id.trim().parse::<i32>().ok().filter(|id| *id > 0)
}

/// Creates and configures a PostgreSQL connection pool
///
/// Connects eagerly so an unreachable store fails at startup.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    tracing::debug!(
        "Creating database connection pool for {}:{}/{}",
        config.host,
        config.port,
        config.name
    );

    let options = PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(DatabaseError::Connection)?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
