//! In-memory [`DatabaseService`] used by the router and repository tests.
//!
//! Data lives in a `BTreeMap` keyed by id so listing follows insertion order
//! like a serial primary key would. The store can be switched to an
//! "unavailable" mode where every call fails with the matching `*Failed`
//! variant, to exercise the 500 paths.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{parse_student_id, DatabaseError, DatabaseService};
use crate::auth::models::{NewUser, User};
use crate::models::{NewStudent, Student, StudentChanges};

#[derive(Clone, Default)]
pub struct MemoryDatabase {
    data: Arc<RwLock<MemoryData>>,
}

#[derive(Default)]
struct MemoryData {
    students: BTreeMap<i32, Student>,
    users: BTreeMap<i32, User>,
    next_student_id: i32,
    next_user_id: i32,
    unavailable: bool,
}

fn outage() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.data.write().expect("memory store poisoned").unavailable = unavailable;
    }

    pub fn student_count(&self) -> usize {
        self.data.read().expect("memory store poisoned").students.len()
    }
}

#[async_trait]
impl DatabaseService for MemoryDatabase {
    async fn find_student(&self, id: &str) -> Result<Student, DatabaseError> {
        let data = self.data.read().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::FindStudentFailed(outage()));
        }
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;
        data.students
            .get(&id)
            .cloned()
            .ok_or(DatabaseError::StudentNotFound)
    }

    async fn list_students(&self, offset: i64, limit: i64) -> Result<Vec<Student>, DatabaseError> {
        let data = self.data.read().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::ListStudentsFailed(outage()));
        }
        Ok(data
            .students
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn create_student(&self, student: NewStudent) -> Result<Student, DatabaseError> {
        let mut data = self.data.write().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::CreateStudentFailed(outage()));
        }
        data.next_student_id += 1;
        let created = student.with_id(data.next_student_id);
        data.students.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_student(
        &self,
        id: &str,
        changes: StudentChanges,
    ) -> Result<Student, DatabaseError> {
        let mut data = self.data.write().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::FindStudentFailed(outage()));
        }
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;
        let existing = data
            .students
            .get(&id)
            .cloned()
            .ok_or(DatabaseError::StudentNotFound)?;
        let updated = changes.apply_to(existing);
        data.students.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete_student(&self, id: &str) -> Result<(), DatabaseError> {
        let mut data = self.data.write().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::DeleteStudentFailed(outage()));
        }
        let id = parse_student_id(id).ok_or(DatabaseError::StudentNotFound)?;
        data.students
            .remove(&id)
            .map(|_| ())
            .ok_or(DatabaseError::StudentNotFound)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<User, DatabaseError> {
        let data = self.data.read().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::FindUserFailed(outage()));
        }
        data.users
            .values()
            .find(|user| user.email == email)
            .cloned()
            .ok_or(DatabaseError::UserNotFound)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut data = self.data.write().expect("memory store poisoned");
        if data.unavailable {
            return Err(DatabaseError::CreateUserFailed(outage()));
        }
        if data.users.values().any(|existing| existing.email == user.email) {
            return Err(DatabaseError::UserAlreadyExists);
        }
        data.next_user_id += 1;
        let created = user.with_id(data.next_user_id);
        data.users.insert(created.id, created.clone());
        Ok(created)
    }
}
