//! Repository for companies, their SLA configs, and chat provider configs.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::company::{Company, CompanyChatProvider, CompanySlaConfig, CreateCompany};

/// Column list for `companies` queries.
const COLUMNS: &str =
    "id, name, code, contact_person, contact_email, contact_phone, is_active, created_at, updated_at";

/// Provides access to company records and their configuration.
pub struct CompanyRepo;

impl CompanyRepo {
    /// Create a company.
    pub async fn create(pool: &PgPool, input: &CreateCompany) -> Result<Company, sqlx::Error> {
        let query = format!(
            "INSERT INTO companies (name, code, contact_person, contact_email, contact_phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Company>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.contact_person)
            .bind(&input.contact_email)
            .bind(&input.contact_phone)
            .fetch_one(pool)
            .await
    }

    /// Find a company by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Company>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM companies WHERE id = $1");
        sqlx::query_as::<_, Company>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Get the SLA config for a company, if one exists.
    ///
    /// `None` means the company does not track SLAs: tickets get no
    /// deadlines and default priority.
    pub async fn get_sla_config(
        pool: &PgPool,
        company_id: DbId,
    ) -> Result<Option<CompanySlaConfig>, sqlx::Error> {
        sqlx::query_as::<_, CompanySlaConfig>(
            "SELECT id, company_id, priority_level, response_minutes, resolution_minutes, \
                    idle_timeout_minutes, created_at, updated_at \
             FROM company_sla_configs WHERE company_id = $1",
        )
        .bind(company_id)
        .fetch_optional(pool)
        .await
    }

    /// Insert or replace the SLA config for a company.
    pub async fn upsert_sla_config(
        pool: &PgPool,
        company_id: DbId,
        priority_level: i32,
        response_minutes: Option<i32>,
        resolution_minutes: Option<i32>,
        idle_timeout_minutes: i32,
    ) -> Result<CompanySlaConfig, sqlx::Error> {
        sqlx::query_as::<_, CompanySlaConfig>(
            "INSERT INTO company_sla_configs \
                (company_id, priority_level, response_minutes, resolution_minutes, idle_timeout_minutes) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (company_id) DO UPDATE \
                SET priority_level = EXCLUDED.priority_level, \
                    response_minutes = EXCLUDED.response_minutes, \
                    resolution_minutes = EXCLUDED.resolution_minutes, \
                    idle_timeout_minutes = EXCLUDED.idle_timeout_minutes, \
                    updated_at = NOW() \
             RETURNING id, company_id, priority_level, response_minutes, resolution_minutes, \
                       idle_timeout_minutes, created_at, updated_at",
        )
        .bind(company_id)
        .bind(priority_level)
        .bind(response_minutes)
        .bind(resolution_minutes)
        .bind(idle_timeout_minutes)
        .fetch_one(pool)
        .await
    }

    /// Get the enabled chat provider config for a company and channel.
    ///
    /// Returns `None` when the provider is missing or disabled; the caller
    /// skips the channel in that case.
    pub async fn get_enabled_chat_provider(
        pool: &PgPool,
        company_id: DbId,
        provider: &str,
    ) -> Result<Option<CompanyChatProvider>, sqlx::Error> {
        sqlx::query_as::<_, CompanyChatProvider>(
            "SELECT id, company_id, provider, is_enabled, webhook_url, created_at, updated_at \
             FROM company_chat_providers \
             WHERE company_id = $1 AND provider = $2 AND is_enabled = true",
        )
        .bind(company_id)
        .bind(provider)
        .fetch_optional(pool)
        .await
    }

    /// Insert or replace a chat provider config for a company.
    pub async fn upsert_chat_provider(
        pool: &PgPool,
        company_id: DbId,
        provider: &str,
        is_enabled: bool,
        webhook_url: Option<&str>,
    ) -> Result<CompanyChatProvider, sqlx::Error> {
        sqlx::query_as::<_, CompanyChatProvider>(
            "INSERT INTO company_chat_providers (company_id, provider, is_enabled, webhook_url) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (company_id, provider) DO UPDATE \
                SET is_enabled = EXCLUDED.is_enabled, \
                    webhook_url = EXCLUDED.webhook_url, \
                    updated_at = NOW() \
             RETURNING id, company_id, provider, is_enabled, webhook_url, created_at, updated_at",
        )
        .bind(company_id)
        .bind(provider)
        .bind(is_enabled)
        .bind(webhook_url)
        .fetch_one(pool)
        .await
    }
}
