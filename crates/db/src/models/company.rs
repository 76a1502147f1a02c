//! Company entity models: the company itself, its SLA configuration, and
//! its chat-webhook provider configs.

use helpdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `companies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Company {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `company_sla_configs` table. One per company; read once
/// at ticket creation to snapshot the deadlines.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanySlaConfig {
    pub id: DbId,
    pub company_id: DbId,
    pub priority_level: i32,
    pub response_minutes: Option<i32>,
    pub resolution_minutes: Option<i32>,
    pub idle_timeout_minutes: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `company_chat_providers` table: per-company webhook
/// endpoint for a chat channel (`feishu` / `enterprise_wechat`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CompanyChatProvider {
    pub id: DbId,
    pub company_id: DbId,
    pub provider: String,
    pub is_enabled: bool,
    pub webhook_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a company.
#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub code: String,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
}
