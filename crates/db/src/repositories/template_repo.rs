//! Repository for the `notification_templates` table.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateTemplate, NotificationTemplate, UpdateTemplate};

/// Column list for `notification_templates` queries.
const COLUMNS: &str = "id, name, company_id, event_type, channel, is_active, subject_template, \
     body_template, created_at, updated_at";

/// Provides access to notification templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// List all active templates for an event type (global and
    /// company-specific alike); override resolution happens in the caller.
    pub async fn list_active(
        pool: &PgPool,
        event_type: &str,
    ) -> Result<Vec<NotificationTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_templates \
             WHERE event_type = $1 AND is_active = true \
             ORDER BY company_id NULLS LAST, channel"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(event_type)
            .fetch_all(pool)
            .await
    }

    /// List templates visible for a company (its own plus globals), or all
    /// templates when `company_id` is `None`.
    pub async fn list(
        pool: &PgPool,
        company_id: Option<DbId>,
    ) -> Result<Vec<NotificationTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_templates \
             WHERE $1::bigint IS NULL OR company_id = $1 OR company_id IS NULL \
             ORDER BY event_type, channel, company_id NULLS FIRST"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(company_id)
            .fetch_all(pool)
            .await
    }

    /// Find a template by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_templates WHERE id = $1");
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a template.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTemplate,
    ) -> Result<NotificationTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_templates \
                (name, company_id, event_type, channel, subject_template, body_template) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(&input.name)
            .bind(input.company_id)
            .bind(&input.event_type)
            .bind(&input.channel)
            .bind(&input.subject_template)
            .bind(&input.body_template)
            .fetch_one(pool)
            .await
    }

    /// Patch a template's active flag or template strings.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<NotificationTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE notification_templates \
             SET is_active = COALESCE($2, is_active), \
                 subject_template = COALESCE($3, subject_template), \
                 body_template = COALESCE($4, body_template), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationTemplate>(&query)
            .bind(id)
            .bind(input.is_active)
            .bind(&input.subject_template)
            .bind(&input.body_template)
            .fetch_optional(pool)
            .await
    }
}
