//! User entity model and DTOs.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub company_id: Option<DbId>,
    pub phone: Option<String>,
    /// Feishu open id, used for @mentions in Feishu cards.
    pub feishu_id: Option<String>,
    /// Enterprise WeChat user id, used for @mentions in WeCom messages.
    pub enterprise_wechat_id: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub role: Option<String>,
    pub company_id: Option<DbId>,
    pub phone: Option<String>,
    pub feishu_id: Option<String>,
    pub enterprise_wechat_id: Option<String>,
}
