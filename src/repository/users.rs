use std::sync::Arc;

use async_trait::async_trait;

use super::RepositoryResult;
use crate::auth::models::{NewUser, User};
use crate::db::DatabaseService;

/// User account operations
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User>;

    async fn create(&self, user: NewUser) -> RepositoryResult<User>;
}

pub struct UsersRepo {
    db: Arc<dyn DatabaseService>,
}

impl UsersRepo {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for UsersRepo {
    async fn find_by_email(&self, email: &str) -> RepositoryResult<User> {
        Ok(self.db.find_user_by_email(email).await?)
    }

    async fn create(&self, user: NewUser) -> RepositoryResult<User> {
        Ok(self.db.create_user(user).await?)
    }
}
