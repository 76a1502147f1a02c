//! Repository for the `notification_logs` table.
//!
//! Logs are append-mostly: a row is created as `pending` before a delivery
//! attempt and its status is moved exactly once to a terminal state.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::NotificationLog;

/// Column list for `notification_logs` queries.
const COLUMNS: &str = "id, triggered_by, company_id, ticket_id, channel, recipient, subject, \
     status, retry_count, response_info, created_at, sent_at";

/// Provides access to notification delivery logs.
pub struct NotificationLogRepo;

impl NotificationLogRepo {
    /// Create a `pending` log row ahead of a delivery attempt.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        pool: &PgPool,
        triggered_by: Option<DbId>,
        company_id: Option<DbId>,
        ticket_id: Option<DbId>,
        channel: &str,
        recipient: &str,
        subject: &str,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notification_logs \
                (triggered_by, company_id, ticket_id, channel, recipient, subject) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(triggered_by)
        .bind(company_id)
        .bind(ticket_id)
        .bind(channel)
        .bind(recipient)
        .bind(subject)
        .fetch_one(pool)
        .await
    }

    /// Mark a pending row as sent, stamping `sent_at`.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_logs SET status = 'sent', sent_at = NOW() \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a pending row as failed, capturing the error text.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        response_info: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE notification_logs SET status = 'failed', response_info = $2 \
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(response_info)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List log rows, newest first, optionally filtered by ticket or status.
    pub async fn list(
        pool: &PgPool,
        ticket_id: Option<DbId>,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notification_logs \
             WHERE ($1::bigint IS NULL OR ticket_id = $1) \
               AND ($2::text IS NULL OR status = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, NotificationLog>(&query)
            .bind(ticket_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a log row by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<NotificationLog>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_logs WHERE id = $1");
        sqlx::query_as::<_, NotificationLog>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
