// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User database model
///
/// `password` always holds an Argon2 hash and is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
    #[serde(skip_serializing, default)]
    #[schema(write_only)]
    pub password: String,
    #[schema(example = "admin")]
    pub role: String,
}

/// A user ready to be stored, with its password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl NewUser {
    pub fn with_id(self, id: i32) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            role: self.role,
        }
    }
}

fn default_role() -> String {
    "user".to_string()
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
    #[serde(default = "default_role")]
    #[schema(example = "admin")]
    pub role: String,
}

/// Login request DTO
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(length(min = 1, message = "email must not be empty"))]
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserEnvelope {
    pub user: User,
}
