use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::auth::repo_types::{NewUser, User};
use crate::db::{parse_error, DbError};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; a taken username surfaces as `DbError::Conflict`.
    async fn create(&self, user: &NewUser) -> Result<i64, DbError>;

    async fn find_by_username(&self, username: &str) -> Result<User, DbError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, DbError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (first_name, last_name, username, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, username = %user.username, "insert user failed");
            parse_error(e)
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, username, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            error!(error = %e, %username, "find user by username failed");
            parse_error(e)
        })
    }
}
