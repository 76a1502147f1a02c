//! Repository for the `users` table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, username, email, password_hash, role, company_id, phone, feishu_id, \
     enterprise_wechat_id, is_active, is_deleted, deleted_at, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user. `password_hash` must already be an argon2 PHC string.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUser,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users \
                (username, email, password_hash, role, company_id, phone, feishu_id, \
                 enterprise_wechat_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(password_hash)
            .bind(input.role.as_deref().unwrap_or("customer"))
            .bind(input.company_id)
            .bind(&input.phone)
            .bind(&input.feishu_id)
            .bind(&input.enterprise_wechat_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active, non-deleted user by username or email (login lookup).
    pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE (username = $1 OR email = $1) \
               AND is_active = true AND is_deleted = false"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a user, deactivating them at the same time.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users \
             SET is_deleted = true, deleted_at = NOW(), is_active = false, updated_at = NOW() \
             WHERE id = $1 AND is_deleted = false",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
