use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;
use std::borrow::Cow;

use crate::{
    entities::user::{AccountInsert, User},
    errors::AppError,
    repositories::sqlx_repo::SqlxAccountRepo,
};

/// The authentication identity store (the "Account Store" collaborator).
#[automock]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_account(&self, account: &AccountInsert) -> Result<Uuid, AppError>;
    async fn get_account_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn get_account_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
    /// Hard delete. `Ok(false)` means the identity was already gone, which
    /// teardown tolerates; a transport/store failure is an `Err`.
    async fn delete_account(&self, id: &Uuid) -> Result<bool, AppError>;
}

impl SqlxAccountRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAccountRepo { pool }
    }
}

#[async_trait]
impl AccountRepository for SqlxAccountRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn create_account(&self, account: &AccountInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (email, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict("An account with this email already exists".to_string())
                }
                _ => AppError::from(e),
            }
        })?;

        Ok(id)
    }

    async fn get_account_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_account_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn delete_account(&self, id: &Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
