//! Read access to the append-only audit trails.
//!
//! Rows are written by the `TicketRepo` transition transactions; this repo
//! only reads them back.

use helpdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::history::{TicketStatusHistory, TicketTransferHistory};

pub struct HistoryRepo;

impl HistoryRepo {
    /// Status history for a ticket, oldest first.
    pub async fn status_history(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketStatusHistory>, sqlx::Error> {
        sqlx::query_as::<_, TicketStatusHistory>(
            "SELECT id, ticket_id, changed_by, old_status, new_status, reason, created_at \
             FROM ticket_status_history \
             WHERE ticket_id = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await
    }

    /// Transfer history for a ticket, oldest first.
    pub async fn transfer_history(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Vec<TicketTransferHistory>, sqlx::Error> {
        sqlx::query_as::<_, TicketTransferHistory>(
            "SELECT id, ticket_id, transferred_by, transferred_from, transferred_to, reason, \
                    created_at \
             FROM ticket_transfer_history \
             WHERE ticket_id = $1 \
             ORDER BY created_at ASC, id ASC",
        )
        .bind(ticket_id)
        .fetch_all(pool)
        .await
    }
}
