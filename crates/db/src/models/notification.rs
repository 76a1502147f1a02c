//! Notification entity models and DTOs: templates, delivery logs, and
//! per-user channel preferences.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_templates` table.
///
/// `company_id = NULL` marks a global template; a company-specific row for
/// the same (event_type, channel) overrides it during resolution.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationTemplate {
    pub id: DbId,
    pub name: String,
    pub company_id: Option<DbId>,
    pub event_type: String,
    pub channel: String,
    pub is_active: bool,
    pub subject_template: String,
    pub body_template: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `notification_logs` table: one delivery attempt.
///
/// Created with status `pending` before the send; moved exactly once to
/// `sent` or `failed`. `retry_failed` is reserved for an external retry job.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationLog {
    pub id: DbId,
    pub triggered_by: Option<DbId>,
    pub company_id: Option<DbId>,
    pub ticket_id: Option<DbId>,
    pub channel: String,
    pub recipient: Option<String>,
    pub subject: String,
    pub status: String,
    pub retry_count: i32,
    pub response_info: Option<String>,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}

/// A row from the `notification_preferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub id: DbId,
    pub user_id: DbId,
    pub email_enabled: bool,
    pub feishu_enabled: bool,
    pub enterprise_wechat_enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a notification template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub company_id: Option<DbId>,
    pub event_type: String,
    pub channel: String,
    pub subject_template: String,
    pub body_template: String,
}

/// DTO for updating a notification template.
#[derive(Debug, Deserialize)]
pub struct UpdateTemplate {
    pub is_active: Option<bool>,
    pub subject_template: Option<String>,
    pub body_template: Option<String>,
}
