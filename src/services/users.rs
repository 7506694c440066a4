//! User registry service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Register a new user; the email must not be taken
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        if self.repository.users.email_exists(&user.email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already registered", user.email)));
        }
        let created = self.repository.users.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered");
        Ok(created)
    }

    /// Apply a partial update; a new email must not belong to another user
    pub async fn update_user(&self, id: i64, changes: UpdateUser) -> AppResult<User> {
        let mut user = self.repository.users.get_by_id(id).await?;

        if let Some(ref email) = changes.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!("Email {} is already registered", email)));
            }
        }

        changes.apply_to(&mut user);
        self.repository.users.update(&user).await
    }

    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
