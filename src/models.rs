use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A student record as stored in the `students` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = 33)]
    pub age: i32,
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
}

/// Data needed to create a student; the identifier is assigned by the store
///
/// Used for POST /students
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct NewStudent {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    #[schema(example = "John")]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[validate(range(min = 0, message = "age must not be negative"))]
    #[schema(example = 33)]
    pub age: i32,
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
}

impl NewStudent {
    pub fn with_id(self, id: i32) -> Student {
        Student {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            email: self.email,
        }
    }
}

/// Fields that may be overwritten on an existing student
///
/// Used for PATCH /students/{id}. Omitted fields keep their stored value;
/// an `id` in the body is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct StudentChanges {
    #[validate(length(min = 1, message = "first_name must not be empty"))]
    #[schema(example = "Jane")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "last_name must not be empty"))]
    pub last_name: Option<String>,
    #[validate(range(min = 0, message = "age must not be negative"))]
    #[schema(example = 34)]
    pub age: Option<i32>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
}

impl StudentChanges {
    /// Overwrite the mutable fields of `student`, leaving its id untouched
    pub fn apply_to(self, mut student: Student) -> Student {
        if let Some(first_name) = self.first_name {
            student.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            student.last_name = last_name;
        }
        if let Some(age) = self.age {
            student.age = age;
        }
        if let Some(email) = self.email {
            student.email = email;
        }
        student
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentEnvelope {
    pub student: Student,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentListEnvelope {
    pub students: Vec<Student>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "pong")]
    pub message: String,
}
