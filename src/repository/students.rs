use std::sync::Arc;

use async_trait::async_trait;

use super::RepositoryResult;
use crate::db::DatabaseService;
use crate::models::{NewStudent, Student, StudentChanges};

/// Student record operations
#[async_trait]
pub trait StudentsRepository: Send + Sync {
    async fn find(&self, id: &str) -> RepositoryResult<Student>;

    async fn list(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Student>>;

    async fn create(&self, student: NewStudent) -> RepositoryResult<Student>;

    async fn update(&self, id: &str, changes: StudentChanges) -> RepositoryResult<Student>;

    async fn delete(&self, id: &str) -> RepositoryResult<()>;
}

pub struct StudentsRepo {
    db: Arc<dyn DatabaseService>,
}

impl StudentsRepo {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentsRepository for StudentsRepo {
    async fn find(&self, id: &str) -> RepositoryResult<Student> {
        Ok(self.db.find_student(id).await?)
    }

    async fn list(&self, offset: i64, limit: i64) -> RepositoryResult<Vec<Student>> {
        Ok(self.db.list_students(offset, limit).await?)
    }

    async fn create(&self, student: NewStudent) -> RepositoryResult<Student> {
        Ok(self.db.create_student(student).await?)
    }

    async fn update(&self, id: &str, changes: StudentChanges) -> RepositoryResult<Student> {
        Ok(self.db.update_student(id, changes).await?)
    }

    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        Ok(self.db.delete_student(id).await?)
    }
}
