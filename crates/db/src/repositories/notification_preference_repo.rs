//! Repository for per-user notification channel preferences.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NotificationPreference;

const COLUMNS: &str = "id, user_id, email_enabled, feishu_enabled, enterprise_wechat_enabled, \
     created_at, updated_at";

pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// The preference row for a user. `None` means the defaults apply
    /// (email on, chat channels off).
    pub async fn get_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<NotificationPreference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1");
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or update a user's preference row.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        email_enabled: bool,
        feishu_enabled: bool,
        enterprise_wechat_enabled: bool,
    ) -> Result<NotificationPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_preferences \
                (user_id, email_enabled, feishu_enabled, enterprise_wechat_enabled) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id) DO UPDATE \
                SET email_enabled = EXCLUDED.email_enabled, \
                    feishu_enabled = EXCLUDED.feishu_enabled, \
                    enterprise_wechat_enabled = EXCLUDED.enterprise_wechat_enabled, \
                    updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(email_enabled)
            .bind(feishu_enabled)
            .bind(enterprise_wechat_enabled)
            .fetch_one(pool)
            .await
    }

    /// Whether email notifications are enabled for a user (default: yes).
    pub async fn email_enabled(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let enabled: Option<bool> = sqlx::query_scalar(
            "SELECT email_enabled FROM notification_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(enabled.unwrap_or(true))
    }
}
