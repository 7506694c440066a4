//! Users repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, User},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Fails with `NotFound` when no user has this id
    async fn get_by_id(&self, id: i64) -> AppResult<User>;

    /// Check if email already exists, optionally ignoring one user
    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool>;

    async fn create(&self, user: &CreateUser) -> AppResult<User>;

    /// Persist every field of `user`
    async fn update(&self, user: &User) -> AppResult<User>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgUsersRepository {
    pool: Pool<Postgres>,
}

impl PgUsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UsersRepository for PgUsersRepository {
    async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<i64>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) AND id != $2)")
                .bind(email)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn create(&self, user: &CreateUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id, name, email",
        )
        .bind(&user.name)
        .bind(&user.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET name = $2, email = $3 WHERE id = $1 RETURNING id, name, email",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", user.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}
