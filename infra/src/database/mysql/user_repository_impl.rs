//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use bb_core::domain::entities::user::{NewUser, User, UserRole};
use bb_core::errors::{AuthError, DomainError};
use bb_core::repositories::UserRepository;
use chrono::Utc;
use sqlx::mysql::MySqlRow;
use sqlx::MySqlPool;

use super::{column, is_unique_violation};
use crate::InfrastructureError;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, created_at, updated_at, deleted_at";

/// MySQL implementation of UserRepository
///
/// Users are read and written outside the bill transactions, straight
/// through the pool.
pub struct MySqlUserRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new MySQL user repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to User entity
    fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
        let role: String = column(row, "role")?;
        Ok(User {
            id: column(row, "id")?,
            username: column(row, "username")?,
            email: column(row, "email")?,
            password_hash: column(row, "password_hash")?,
            role: role.parse::<UserRole>().map_err(DomainError::internal)?,
            created_at: column(row, "created_at")?,
            updated_at: column(row, "updated_at")?,
            deleted_at: column(row, "deleted_at")?,
        })
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE username = ? AND deleted_at IS NULL LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE id = ? AND deleted_at IS NULL LIMIT 1",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(InfrastructureError::from)?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let query = r#"
            INSERT INTO users (username, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
        "#;

        let result = sqlx::query(query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::Auth(AuthError::UsernameTaken)
                } else {
                    InfrastructureError::from(e).into()
                }
            })?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::internal(format!("Inserted user {} not found", id)))
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, DomainError> {
        let row = sqlx::query(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? AND deleted_at IS NULL) AS found",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(InfrastructureError::from)?;

        let found: i64 = column(&row, "found")?;
        Ok(found == 1)
    }
}
