use crate::domain::{models::user::{NewUser, User}, ports::UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::error;

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepo {
    async fn create(&self, user: &NewUser) -> Result<User, AppError> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, role, name, must_change_password, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, username, password_hash, role, name, team, phone, must_change_password, created_at, updated_at",
        )
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.role)
            .bind(&user.name)
            .bind(user.must_change_password)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, name, team, phone, must_change_password, created_at, updated_at
             FROM users WHERE username = $1",
        )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, role, name, team, phone, must_change_password, created_at, updated_at
             FROM users WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count_by_role(&self, role: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn update_password(&self, id: i64, password_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $1, must_change_password = FALSE, updated_at = $2 WHERE id = $3"
        )
            .bind(password_hash)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Postgres password update failed: {:?}", e);
                AppError::Database(e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
