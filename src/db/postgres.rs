use async_trait::async_trait;
use sqlx::PgPool;

use super::{parse_student_id, DatabaseError, DatabaseService};
use crate::auth::models::{NewUser, User};
use crate::models::{NewStudent, Student, StudentChanges};

/// PostgreSQL-backed implementation of [`DatabaseService`]
#[derive(Clone)]
pub struct PgDatabaseService {
    pool: PgPool,
}

impl PgDatabaseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseService for PgDatabaseService {
    async fn find_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;

        sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, age, email FROM students WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::FindStudentFailed)?
        .ok_or(DatabaseError::StudentNotFound)
    }

    async fn list_students(&self, offset: i64, limit: i64) -> Result<Vec<Student>, DatabaseError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, first_name, last_name, age, email
            FROM students
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::ListStudentsFailed)
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, DatabaseError> {
        let created = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (first_name, last_name, age, email)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, age, email
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(student.age)
        .bind(&student.email)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::CreateStudentFailed)?;

        tracing::info!("Created student with id: {}", created.id);
        Ok(created)
    }

    async fn update_student(
        &self,
        id: &str,
        changes: StudentChanges,
    ) -> Result<Student, DatabaseError> {
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;

        // Rolled back on drop if any step fails
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DatabaseError::UpdateStudentFailed)?;

        let existing = sqlx::query_as::<_, Student>(
            "SELECT id, first_name, last_name, age, email FROM students WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::FindStudentFailed)?
        .ok_or(DatabaseError::StudentNotFound)?;

        let student = changes.apply_to(existing);

        let updated = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET first_name = $1,
                last_name = $2,
                age = $3,
                email = $4
            WHERE id = $5
            RETURNING id, first_name, last_name, age, email
            "#,
        )
        .bind(&student.first_name)
        .bind(&student.last_name)
        .bind(student.age)
        .bind(&student.email)
        .bind(student.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::UpdateStudentFailed)?;

        tx.commit().await.map_err(DatabaseError::UpdateStudentFailed)?;

        tracing::info!("Updated student with id: {}", updated.id);
        Ok(updated)
    }

    async fn delete_student(&self, id: &str) -> Result<(), DatabaseError> {
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(DatabaseError::DeleteStudentFailed)?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT id FROM students WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(DatabaseError::FindStudentFailed)?;

        if exists.is_none() {
            return Err(DatabaseError::StudentNotFound);
        }

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(DatabaseError::DeleteStudentFailed)?;

        tx.commit().await.map_err(DatabaseError::DeleteStudentFailed)?;

        tracing::info!("Deleted student with id: {}", id);
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::FindUserFailed)?
        .ok_or(DatabaseError::UserNotFound)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, role
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DatabaseError::UserAlreadyExists;
                }
            }
            DatabaseError::CreateUserFailed(e)
        })?;

        tracing::info!("Created user with id: {}", created.id);
        Ok(created)
    }
}
