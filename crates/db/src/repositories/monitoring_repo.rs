//! Read-side monitoring aggregations over the ticket store.
//!
//! All queries exclude `closed`, `resolved`, and `paused` tickets — paused
//! tickets are exempt from SLA and idle pressure. Approaching/missed
//! results order by the relevant deadline (soonest first); idle results
//! order by `last_activity_at` (stalest first).

use sqlx::PgPool;

use crate::models::ticket::Ticket;

const COLUMNS: &str = "id, title, description, company_id, created_by, submitted_by, assigned_to, \
     status, priority, urgency, category, subcategory, contact_method, contact_info, \
     ticket_type_id, url_slug, created_at, updated_at, last_activity_at, first_replied_at, \
     last_customer_reply_at, last_support_reply_at, resolved_at, closed_at, paused_at, \
     pause_reason, closing_reason_type, closing_reason_detail, sla_ir_deadline, \
     sla_resolution_deadline";

const ACTIVE_FILTER: &str = "status NOT IN ('closed', 'resolved', 'paused')";

/// Read-only SLA and idle-ticket monitoring queries.
pub struct MonitoringRepo;

impl MonitoringRepo {
    /// Open tickets with no first reply whose IR deadline falls within the
    /// next `window_minutes`.
    pub async fn approaching_ir(
        pool: &PgPool,
        window_minutes: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE {ACTIVE_FILTER} \
               AND first_replied_at IS NULL \
               AND sla_ir_deadline IS NOT NULL \
               AND sla_ir_deadline > NOW() \
               AND sla_ir_deadline <= NOW() + $1 * INTERVAL '1 minute' \
             ORDER BY sla_ir_deadline ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(window_minutes)
            .fetch_all(pool)
            .await
    }

    /// Open tickets that missed the IR deadline: either never replied and
    /// past the deadline, or first-replied after it.
    pub async fn missed_ir(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE {ACTIVE_FILTER} \
               AND sla_ir_deadline IS NOT NULL \
               AND ((first_replied_at IS NULL AND sla_ir_deadline < NOW()) \
                 OR (first_replied_at IS NOT NULL AND first_replied_at > sla_ir_deadline)) \
             ORDER BY sla_ir_deadline ASC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    /// Open tickets whose resolution deadline falls within the next
    /// `window_minutes`.
    pub async fn approaching_resolution(
        pool: &PgPool,
        window_minutes: i64,
    ) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE {ACTIVE_FILTER} \
               AND resolved_at IS NULL \
               AND sla_resolution_deadline IS NOT NULL \
               AND sla_resolution_deadline > NOW() \
               AND sla_resolution_deadline <= NOW() + $1 * INTERVAL '1 minute' \
             ORDER BY sla_resolution_deadline ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(window_minutes)
            .fetch_all(pool)
            .await
    }

    /// Open tickets that missed the resolution deadline.
    pub async fn missed_resolution(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE {ACTIVE_FILTER} \
               AND sla_resolution_deadline IS NOT NULL \
               AND ((resolved_at IS NULL AND sla_resolution_deadline < NOW()) \
                 OR (resolved_at IS NOT NULL AND resolved_at > sla_resolution_deadline)) \
             ORDER BY sla_resolution_deadline ASC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }

    /// Open tickets with no activity for more than `idle_days` days.
    pub async fn idle(pool: &PgPool, idle_days: i64) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE {ACTIVE_FILTER} \
               AND last_activity_at < NOW() - $1 * INTERVAL '1 day' \
             ORDER BY last_activity_at ASC"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(idle_days)
            .fetch_all(pool)
            .await
    }

    /// Tickets still waiting for an assignee, oldest first.
    pub async fn pending_assignment(pool: &PgPool) -> Result<Vec<Ticket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tickets \
             WHERE status IN ('new_issue', 'pending_assignment') \
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Ticket>(&query).fetch_all(pool).await
    }
}
